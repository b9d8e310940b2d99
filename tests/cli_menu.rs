use assert_cmd::Command;
use predicates::prelude::*;

fn budget(db: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("budget").unwrap();
    cmd.arg("--db").arg(db);
    cmd
}

#[test]
fn test_exit_immediately() {
    let dir = tempfile::tempdir().unwrap();
    budget(&dir.path().join("budget.db"))
        .write_stdin("8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Personal Budget Tracker ---"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_add_then_view_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("budget.db");

    budget(&db)
        .write_stdin("2\nfood\nlunch\n12.50\n8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Expense added successfully!"));

    budget(&db)
        .write_stdin("3\n4\n8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Category: food, Description: lunch, Amount: 12.50, Type: expense",
        ))
        .stdout(predicate::str::contains("food: $12.50"));
}

#[test]
fn test_invalid_choice_and_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    budget(&dir.path().join("budget.db"))
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice! Please try again."));
}

#[test]
fn test_unopenable_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    budget(&dir.path().join("missing").join("budget.db"))
        .write_stdin("8\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Database error"));
}

#[test]
fn test_unreadable_row_does_not_end_the_menu() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("budget.db");

    budget(&db)
        .write_stdin("2\nfood\nlunch\n12.50\n8\n")
        .assert()
        .success();
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute(
        "INSERT INTO transactions (date, category, description, amount, type) VALUES ('2025-01-15 10:00:00', 'misc', 'typed by hand', 5.0, 'Expense')",
        [],
    )
    .unwrap();
    drop(conn);

    budget(&db)
        .write_stdin("3\n4\n8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Stored transaction 2 has unknown type 'Expense'"))
        .stdout(predicate::str::contains("food: $12.50"))
        .stdout(predicate::str::contains("misc: $").not())
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_huge_amount_is_rejected_and_views_keep_working() {
    let dir = tempfile::tempdir().unwrap();
    budget(&dir.path().join("budget.db"))
        .write_stdin("1\nlottery\njackpot\n79228162514264337593543950335\n3\n5\n01\n2025\n8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("is too large, the limit is 1000000000000"))
        .stdout(predicate::str::contains("Net Savings: $0.00"))
        .stdout(predicate::str::contains("Goodbye!"));
}
