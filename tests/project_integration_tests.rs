//! Integration tests for argument resolution against real project folders
//!
//! These tests verify:
//! - The validation order and exit codes of the command-line resolver
//! - Project folders deriving their input stack from the raw-data member
//! - Rebinding and window-state persistence surviving a reopen

mod common;

use common::*;
use std::fs;
use tr2d::cli;
use tr2d::error::{FilesystemError, LaunchError};
use tr2d::project::{Member, ProjectFolder};
use tr2d::{TimeRange, WindowGeometry, WindowStateStore};

#[test]
fn test_resolve_complete_configuration() {
    let (_temp_dir, root) = create_temp_dir();
    let stack = write_stack(&root, "stack.tif", 3);
    let project_dir = make_dir(&root, "proj");
    let export_dir = make_dir(&root, "export");

    let resolved = cli::resolve([
        "-p",
        project_dir.as_str(),
        "-i",
        stack.as_str(),
        "-e",
        export_dir.as_str(),
        "-tmin",
        "1",
        "-tmax",
        "2",
        "-run",
    ])
    .unwrap();

    assert!(resolved.config.is_complete());
    assert_eq!(resolved.config.export_folder, Some(export_dir));
    assert_eq!(resolved.config.time_range, TimeRange { min: 1, max: 2 });
    assert!(resolved.config.auto_run);
    assert!(resolved.warnings.is_empty());
    // Opening the project laid out the derived areas, but bound nothing yet.
    let project = resolved.project.unwrap();
    assert!(project.member(Member::Segmentation).is_dir());
    assert!(!project.has_raw_data());
}

#[test]
fn test_double_dash_forms() {
    let (_temp_dir, root) = create_temp_dir();
    let stack = write_stack(&root, "stack.tif", 3);

    let resolved = cli::resolve([
        "--input",
        stack.as_str(),
        "--tmin=2",
        "--max_time",
        "1",
    ])
    .unwrap();

    assert_eq!(resolved.config.input_stack, Some(stack));
    assert_eq!(resolved.config.time_range, TimeRange { min: 2, max: 3 });
    assert_eq!(resolved.warnings.len(), 1);
}

#[test]
fn test_stack_that_is_a_directory_exits_5() {
    let (_temp_dir, root) = create_temp_dir();
    let dir = make_dir(&root, "stack.tif");

    let err = cli::resolve(["-i", dir.as_str()]).unwrap_err();
    assert!(matches!(
        err,
        LaunchError::Filesystem(FilesystemError::StackNotFound(_))
    ));
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn test_project_with_dangling_raw_data_exits_7() {
    let (_temp_dir, root) = create_temp_dir();
    let stack = write_stack(&root, "stack.tif", 3);
    let project_dir = make_dir(&root, "proj");
    ProjectFolder::open(&project_dir)
        .unwrap()
        .restart_with_raw_data(&stack)
        .unwrap();
    fs::remove_file(&stack).unwrap();

    let err = cli::resolve(["-p", project_dir.as_str()]).unwrap_err();
    assert_eq!(err.exit_code(), 7);
}

#[test]
fn test_corrupt_raw_data_exits_7() {
    let (_temp_dir, root) = create_temp_dir();
    let project_dir = make_dir(&root, "proj");
    fs::write(project_dir.join("raw_data.yaml"), "not: [valid").unwrap();

    let err = cli::resolve(["-p", project_dir.as_str()]).unwrap_err();
    assert_eq!(err.exit_code(), 7);
}

#[test]
fn test_blocked_project_layout_exits_8() {
    let (_temp_dir, root) = create_temp_dir();
    let stack = write_stack(&root, "stack.tif", 3);
    let project_dir = make_dir(&root, "proj");
    // A file where a derived directory belongs
    fs::write(project_dir.join("tracking"), "").unwrap();

    let err = cli::resolve(["-p", project_dir.as_str(), "-i", stack.as_str()]).unwrap_err();
    assert_eq!(err.exit_code(), 8);
}

#[test]
fn test_rebinding_wipes_derived_results() {
    let (_temp_dir, root) = create_temp_dir();
    let first = write_stack(&root, "first.tif", 3);
    let second = write_stack(&root, "second.tif", 3);
    let project_dir = make_dir(&root, "proj");

    let project = ProjectFolder::open(&project_dir).unwrap();
    project.restart_with_raw_data(&first).unwrap();
    let result = project.member(Member::Tracking).join("tracks.csv");
    fs::write(&result, "id\n").unwrap();

    project.restart_with_raw_data(&second).unwrap();

    assert!(!result.exists());
    assert!(project.member(Member::Tracking).is_dir());
    let reopened = ProjectFolder::open(&project_dir).unwrap();
    assert_eq!(reopened.raw_data_source().unwrap(), second);
}

#[test]
fn test_window_state_survives_reopen() {
    let (_temp_dir, root) = create_temp_dir();
    let project_dir = make_dir(&root, "proj");
    let store = WindowStateStore::new(DEFAULT_GEOMETRY);

    let project = ProjectFolder::open(&project_dir).unwrap();
    assert_eq!(store.load(&project), DEFAULT_GEOMETRY);

    let geometry = WindowGeometry::new(-20, 15, 1024, 768);
    store.save(&project, &geometry).unwrap();

    let reopened = ProjectFolder::open(&project_dir).unwrap();
    assert_eq!(store.load(&reopened), geometry);
}
