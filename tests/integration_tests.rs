use report_card::config::LoadOptions;
use report_card::grading::validate;
use report_card::output::{load, load_with, save};
use report_card::report::{export_reports, render};
use report_card::stats::summarize;
use report_card::{Roster, RosterError, StudentRecord};
use std::fs;

fn subjects(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn build(name: &str, roll: Option<&str>, subjects: &[String], tokens: &[&str]) -> StudentRecord {
    let marks = tokens.iter().map(|t| validate(t).unwrap()).collect();
    StudentRecord::build(name, roll, subjects, marks).unwrap()
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    let subjects = subjects(&["English", "Maths", "Science", "Social", "Human Values"]);

    let mut roster = Roster::new();
    roster.add(build("Asha", Some("1"), &subjects, &["95", "90", "88", "92", "100"]));
    roster.add(build("Ben, Jr.", None, &subjects, &["35", "20", "41", "10", "30"]));
    roster.add(build("Chen \"CJ\"", Some("3"), &subjects, &["70", "66", "59", "81", "74"]));

    assert_eq!(save(&roster, &subjects, &path).unwrap(), 3);

    let loaded = load(&path, &subjects).unwrap();
    assert_eq!(loaded, roster);
    assert!(loaded.iter().all(|r| r.revalidate(subjects.len())));

    let stats = summarize(&loaded).unwrap();
    assert_eq!(stats.top_students, ["Asha"]);
    assert_eq!(stats.highest_percentage, 93.0);
    assert_eq!(stats.lowest_percentage, 27.2);
    assert_eq!(stats.pass_rate_percent, 66.67);

    let folder = dir.path().join("report_cards");
    assert_eq!(export_reports(&loaded, &subjects, &folder).unwrap(), 3);
    let card = fs::read_to_string(folder.join("Ben_ Jr_.txt")).unwrap();
    assert_eq!(card, render(&loaded.records()[1], &subjects));
}

#[test]
fn test_round_trip_keeps_odd_percentages_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thirds.csv");
    let subjects = subjects(&["A", "B", "C"]);

    let roster: Roster = [[100, 100, 0], [1, 0, 0], [99, 98, 100], [0, 0, 0]]
        .iter()
        .enumerate()
        .map(|(i, marks)| {
            StudentRecord::build(&format!("S{i}"), None, &subjects, marks.to_vec()).unwrap()
        })
        .collect();

    save(&roster, &subjects, &path).unwrap();
    assert_eq!(load(&path, &subjects).unwrap(), roster);
}

#[test]
fn test_saved_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.csv");
    let subjects = subjects(&["Math", "Science"]);
    let roster: Roster = vec![build("Asha", None, &subjects, &["90", "85"])]
        .into_iter()
        .collect();

    save(&roster, &subjects, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "name,rollId,Math,Science,total,percentage,grade");
    assert_eq!(lines[1], "Asha,,90,85,175,87.5,A");
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_save_overwrites_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    let subjects = subjects(&["Math"]);
    fs::write(&path, "stale").unwrap();

    let roster: Roster = vec![build("Ivy", None, &subjects, &["60"])].into_iter().collect();
    save(&roster, &subjects, &path).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, ["students.csv"]);
    assert_eq!(load(&path, &subjects).unwrap(), roster);
}

#[test]
fn test_save_to_unwritable_destination() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("students.csv");
    let subjects = subjects(&["Math"]);
    let roster: Roster = vec![build("Ivy", None, &subjects, &["60"])].into_iter().collect();

    let err = save(&roster, &subjects, &path).unwrap_err();

    assert!(matches!(err, RosterError::Io(_)));
    assert!(!path.exists());
    assert_eq!(roster.len(), 1);
}

#[test]
fn test_save_empty_roster_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let subjects = subjects(&["Math"]);

    assert_eq!(save(&Roster::new(), &subjects, &path).unwrap(), 0);
    assert_eq!(
        fs::read_to_string(&path).unwrap().trim_end(),
        "name,rollId,Math,total,percentage,grade"
    );
    assert!(load(&path, &subjects).unwrap().is_empty());
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");

    assert!(load(&path, &subjects(&["Math"])).unwrap().is_empty());
    assert!(
        load_with(&path, &subjects(&["Math"]), LoadOptions::strict())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_load_without_science_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.csv");
    fs::write(
        &path,
        "name,rollId,Math,total,percentage,grade\nAsha,1,90,90,90.0,A+\nBen,2,30,30,30.0,F\n",
    )
    .unwrap();

    let roster = load(&path, &subjects(&["Math", "Science"])).unwrap();

    assert_eq!(roster.len(), 2);
    assert_eq!(roster.records()[0].marks, [90, 0]);
    assert_eq!(roster.records()[1].marks, [30, 0]);
    // Stored fields are trusted, so these no longer revalidate.
    assert!(!roster.records()[0].revalidate(2));
}

#[test]
fn test_load_appends_to_existing_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    let subjects = subjects(&["Math"]);

    let saved: Roster = vec![build("Old", None, &subjects, &["50"])].into_iter().collect();
    save(&saved, &subjects, &path).unwrap();

    let mut session: Roster = vec![build("New", None, &subjects, &["70"])].into_iter().collect();
    session.extend(load(&path, &subjects).unwrap());

    let names: Vec<&str> = session.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["New", "Old"]);
}

#[test]
fn test_tied_top_students() {
    let subjects = subjects(&["Math"]);
    let roster: Roster = vec![
        build("Ana", None, &subjects, &["95"]),
        build("Ben", None, &subjects, &["95"]),
        build("Cal", None, &subjects, &["30"]),
    ]
    .into_iter()
    .collect();

    let stats = summarize(&roster).unwrap();

    assert_eq!(stats.highest_percentage, 95.0);
    assert_eq!(stats.top_students, ["Ana", "Ben"]);
    assert_eq!(stats.pass_rate_percent, 66.67);
}
