//! Terminal tables for sections, tasks, the calendar and the account.
//!
//! Every view prints straight to stdout with `prettytable`. Table building is
//! split from printing where the layout carries logic worth testing.

use super::calendar::{bucket_title, date_label, due_urgency, Bucket};
use super::hierarchy::SectionTree;
use super::section::Section;
use super::task::{Task, User};
use chrono::NaiveDate;
use prettytable::{row, Table};

pub struct View {}

fn status(task: &Task) -> &'static str {
    match (task.is_completed, task.is_archived) {
        (_, true) => "archived",
        (true, false) => "done",
        (false, false) => "",
    }
}

fn due(task: &Task, today: NaiveDate) -> String {
    match task.due_to {
        Some(date) => format!("{}{}", due_urgency(date, today), date_label(date, today)),
        None => String::new(),
    }
}

fn recurrence(task: &Task) -> String {
    task.recurrence.map(|r| r.to_string()).unwrap_or_default()
}

/// Builds the section table: one row per node, indented by depth.
///
/// Task counts are not shown because the sections endpoint never embeds
/// tasks; only `GET /section/{id}` does.
pub fn section_table(tree: &SectionTree) -> Table {
    fn walk(sections: &[Section], depth: usize, table: &mut Table) {
        for section in sections {
            table.add_row(row![format!("{}{}", "  ".repeat(depth), section.title), section.id]);
            walk(&section.subsections, depth + 1, table);
        }
    }

    let mut table = Table::new();
    table.add_row(row!["SECTION", "ID"]);
    walk(&tree.sections, 0, &mut table);
    table
}

impl View {
    /// Prints the section hierarchy.
    ///
    /// # Arguments
    ///
    /// * `tree` - Sections as returned by `Store::section_tree`
    pub fn sections(tree: &SectionTree) {
        section_table(tree).printstd();
    }

    /// Tasks in display order; `#` is the zero-based position used by
    /// `task reorder`.
    pub fn tasks(tasks: &[Task], today: NaiveDate) {
        let mut table = Table::new();
        table.add_row(row!["#", "TITLE", "DUE", "REPEATS", "STATUS", "FILES", "ID"]);
        for (index, task) in tasks.iter().enumerate() {
            table.add_row(row![
                index,
                task.title,
                due(task, today),
                recurrence(task),
                status(task),
                task.attachments.len(),
                task.id
            ]);
        }
        table.printstd();
    }

    /// Prints one task with its fields, then its attachments if it has any.
    pub fn task(task: &Task, today: NaiveDate) {
        let mut table = Table::new();
        table.add_row(row!["TITLE", task.title]);
        if let Some(description) = &task.description {
            table.add_row(row!["DESCRIPTION", description]);
        }
        table.add_row(row!["DUE", due(task, today)]);
        table.add_row(row!["REPEATS", recurrence(task)]);
        table.add_row(row!["STATUS", status(task)]);
        table.add_row(row!["ADDED", task.added_at]);
        table.add_row(row!["SECTION", task.section_id]);
        table.add_row(row!["ID", task.id]);
        table.printstd();

        if !task.attachments.is_empty() {
            let mut files = Table::new();
            files.add_row(row!["ATTACHMENT", "ADDED", "ID"]);
            for attachment in &task.attachments {
                files.add_row(row![attachment.s3_file_key, attachment.added_at, attachment.id]);
            }
            files.printstd();
        }
    }

    /// Prints each day bucket under its title; empty days show a dash.
    pub fn calendar(buckets: &[Bucket], today: NaiveDate) {
        for bucket in buckets {
            println!("{}", bucket_title(bucket, today));
            if bucket.tasks.is_empty() {
                println!("  -");
                continue;
            }
            let mut table = Table::new();
            for task in &bucket.tasks {
                let mark = if task.is_completed { "[x]" } else { "[ ]" };
                table.add_row(row![mark, task.title, recurrence(task), task.id]);
            }
            table.printstd();
        }
    }

    pub fn user(user: &User) {
        let mut table = Table::new();
        table.add_row(row!["EMAIL", user.email]);
        table.add_row(row!["ACTIVE", user.is_active]);
        table.add_row(row!["VERIFIED", user.is_verified]);
        table.add_row(row!["ID", user.id]);
        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::hierarchy::{build_tree, SectionsQuery};
    use uuid::Uuid;

    fn section(id: u128, title: &str, parent: Option<u128>, subsections: Vec<Section>) -> Section {
        Section {
            id: Uuid::from_u128(id),
            title: title.to_string(),
            parent_id: parent.map(Uuid::from_u128),
            added_at: "2025-01-01T00:00:00".to_string(),
            subsections,
            tasks: vec![],
        }
    }

    fn cells(table: &Table, row: usize) -> Vec<String> {
        let row = table.get_row(row).unwrap();
        (0..row.len()).map(|i| row.get_cell(i).unwrap().get_content()).collect()
    }

    #[test]
    fn section_table_has_no_task_count_column() {
        let tree = build_tree(
            vec![section(
                1,
                "root",
                None,
                vec![section(2, "Home", Some(1), vec![section(4, "Garden", Some(2), vec![])])],
            )],
            SectionsQuery::tree(),
        );
        let table = section_table(&tree);

        assert_eq!(table.len(), 3);
        assert_eq!(cells(&table, 0), vec!["SECTION", "ID"]);
        assert_eq!(cells(&table, 1), vec!["Home".to_string(), Uuid::from_u128(2).to_string()]);
        assert_eq!(cells(&table, 2), vec!["  Garden".to_string(), Uuid::from_u128(4).to_string()]);
    }
}
