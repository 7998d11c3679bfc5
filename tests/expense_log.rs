//! Expense log lifecycle: add, import, search, sort, backup and export.

use std::fs;
use tidydesk::config::{AppPaths, TRACKER_LOG};
use tidydesk::expenses::{ExpenseBook, ExpenseColumn, ExpenseStore};

fn open_book(dir: &tempfile::TempDir) -> ExpenseBook {
    ExpenseBook::open(AppPaths::in_dir(dir.path(), TRACKER_LOG)).unwrap()
}

#[test]
fn imported_rows_join_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_book(&dir);
    book.add("2024-02-01", "Rent", "800", "").unwrap();

    let external = dir.path().join("bank.csv");
    fs::write(
        &external,
        "Date,Category,Amount\n2024-02-03,Food,12.5\nbroken,row\n2024-02-04,Transport,3,bus,extra\n",
    )
    .unwrap();
    assert_eq!(book.import(&external).unwrap(), 2);

    let dates: Vec<String> = book.visible().into_iter().map(|r| r.date).collect();
    assert_eq!(dates, vec!["2024-02-01", "2024-02-03", "2024-02-04"]);
    assert_eq!(book.visible()[2].note, "bus");
    assert_eq!(book.visible()[1].note, "");
}

#[test]
fn search_and_sort_work_on_visible_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_book(&dir);
    book.add("2024-03-01", "Food", "9.5", "Lunch with Ann").unwrap();
    book.add("2024-03-02", "Transport", "120", "train").unwrap();
    book.add("2024-03-03", "Food", "30", "groceries").unwrap();

    book.search("food");
    assert_eq!(book.visible().len(), 2);

    book.sort_by(ExpenseColumn::Amount);
    let amounts: Vec<String> = book.visible().into_iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec!["9.5", "30"]);

    let state = book.sort_by(ExpenseColumn::Amount);
    assert!(state.descending);
    assert_eq!(book.visible()[0].amount, "30");

    book.clear_search();
    assert_eq!(book.visible().len(), 3);
}

#[test]
fn backup_and_export_copy_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_book(&dir);
    book.add("2024-04-01", "Health", "45", "pharmacy, cold").unwrap();

    let backup = book.backup().unwrap();
    let name = backup.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("expenses_backup_") && name.ends_with(".csv"));
    assert_eq!(
        fs::read_to_string(&backup).unwrap(),
        fs::read_to_string(&book.paths().data_file).unwrap()
    );

    let out = dir.path().join("export.csv");
    assert_eq!(book.export(&out).unwrap(), 1);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "date,category,amount,note\n2024-04-01,Health,45,\"pharmacy, cold\"\n"
    );
}

#[test]
fn backup_without_log_gives_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = ExpenseStore::new(AppPaths::in_dir(dir.path(), TRACKER_LOG));
    assert!(store.backup().is_none());
    assert!(store.try_backup().is_err());
}

#[test]
fn categories_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_book(&dir);
    book.save_categories(vec!["Coffee".to_string(), "Books".to_string()])
        .unwrap();
    drop(book);

    let book = open_book(&dir);
    assert_eq!(book.categories().categories, vec!["Coffee", "Books"]);
}

#[cfg(feature = "charts")]
#[test]
fn summary_chart_totals_by_category() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_book(&dir);
    assert!(book.summary_chart().is_err());

    book.add("2024-05-01", "Food", "10", "").unwrap();
    book.add("2024-05-02", "Rent", "500", "").unwrap();
    book.add("2024-05-03", "Food", "5", "").unwrap();
    let chart = book.summary_chart().unwrap();
    assert_eq!(chart.title, "Expense share by category");
    assert_eq!(
        chart.points,
        vec![("Food".to_string(), 15.0), ("Rent".to_string(), 500.0)]
    );
}
