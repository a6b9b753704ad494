//! Table rendering adapter and small widget helpers

use ratatui::{prelude::*, widgets::*};

use crate::models::{NotificationKind, Student};

/// Columns of the student table, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    FirstName,
    SecondName,
    Surnames,
    Role,
    Status,
    Actions,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::FirstName,
        Column::SecondName,
        Column::Surnames,
        Column::Role,
        Column::Status,
        Column::Actions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Column::FirstName => "FIRST NAME",
            Column::SecondName => "SECOND NAME",
            Column::Surnames => "SURNAMES",
            Column::Role => "PROGRAM",
            Column::Status => "FACULTY",
            Column::Actions => "ACTIONS",
        }
    }

    pub fn width(&self) -> Constraint {
        match self {
            Column::FirstName | Column::SecondName => Constraint::Percentage(14),
            Column::Surnames => Constraint::Percentage(18),
            Column::Role => Constraint::Percentage(24),
            Column::Status => Constraint::Percentage(18),
            Column::Actions => Constraint::Length(14),
        }
    }
}

/// Actions offered on every row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit => "e:edit",
            RowAction::Delete => "d:del",
        }
    }
}

/// What a table cell shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellContent {
    Text(String),
    TwoLine { primary: String, secondary: String },
    Actions(Vec<RowAction>),
}

/// Project one student onto one column
pub fn cell(student: &Student, column: Column) -> CellContent {
    match column {
        Column::FirstName => CellContent::Text(student.first_name.clone()),
        Column::SecondName => CellContent::Text(student.second_name.clone()),
        Column::Surnames => CellContent::Text(student.surnames.clone()),
        Column::Role => CellContent::TwoLine {
            primary: student.program_id.clone(),
            secondary: student.programa.clone(),
        },
        Column::Status => CellContent::Text(student.facultad.clone()),
        Column::Actions => CellContent::Actions(vec![RowAction::Edit, RowAction::Delete]),
    }
}

/// Convert cell content into a ratatui table cell
pub fn to_table_cell(content: CellContent, is_selected: bool) -> Cell<'static> {
    let dim = Style::default().fg(Color::Gray);
    match content {
        CellContent::Text(text) => Cell::from(text).style(dim),
        CellContent::TwoLine { primary, secondary } => Cell::from(Text::from(vec![
            Line::from(Span::styled(primary, Style::default().bold())),
            Line::from(Span::styled(secondary, dim)),
        ])),
        CellContent::Actions(actions) => {
            let style = if is_selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let spans: Vec<Span> = actions
                .iter()
                .map(|a| {
                    let color = match a {
                        RowAction::Edit => style,
                        RowAction::Delete if is_selected => Style::default().fg(Color::Red),
                        RowAction::Delete => style,
                    };
                    Span::styled(format!("{} ", a.label()), color)
                })
                .collect();
            Cell::from(Line::from(spans))
        }
    }
}

/// Build a table row for a student
pub fn student_row(student: &Student, is_selected: bool) -> Row<'static> {
    let cells: Vec<Cell> = Column::ALL
        .iter()
        .map(|c| to_table_cell(cell(student, *c), is_selected))
        .collect();
    Row::new(cells).height(2)
}

/// Header row with the column titles
pub fn header_row() -> Row<'static> {
    Row::new(Column::ALL.iter().map(|c| Cell::from(c.title())))
        .style(Style::default().fg(Color::Cyan).bold())
        .bottom_margin(1)
}

/// Column widths matching `Column::ALL`
pub fn column_widths() -> Vec<Constraint> {
    Column::ALL.iter().map(|c| c.width()).collect()
}

/// Notification color
pub fn notification_color(kind: NotificationKind) -> Color {
    match kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    }
}

/// Renders a labelled input field
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool, is_editing: bool) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentId;

    fn ana() -> Student {
        Student {
            id: StudentId::new("1"),
            first_name: "Ana".into(),
            second_name: "María".into(),
            surnames: "Lopez".into(),
            program_id: "P1".into(),
            programa: "Derecho".into(),
            facultad: "Ciencias Sociales".into(),
        }
    }

    #[test]
    fn test_name_columns() {
        let s = ana();
        assert_eq!(cell(&s, Column::FirstName), CellContent::Text("Ana".into()));
        assert_eq!(cell(&s, Column::SecondName), CellContent::Text("María".into()));
        assert_eq!(cell(&s, Column::Surnames), CellContent::Text("Lopez".into()));
    }

    #[test]
    fn test_role_and_status_columns() {
        let s = ana();
        assert_eq!(
            cell(&s, Column::Role),
            CellContent::TwoLine {
                primary: "P1".into(),
                secondary: "Derecho".into()
            }
        );
        assert_eq!(cell(&s, Column::Status), CellContent::Text("Ciencias Sociales".into()));
    }

    #[test]
    fn test_actions_column() {
        assert_eq!(
            cell(&ana(), Column::Actions),
            CellContent::Actions(vec![RowAction::Edit, RowAction::Delete])
        );
    }

    #[test]
    fn test_columns_in_display_order() {
        let titles: Vec<&str> = Column::ALL.iter().map(|c| c.title()).collect();
        assert_eq!(
            titles,
            vec!["FIRST NAME", "SECOND NAME", "SURNAMES", "PROGRAM", "FACULTY", "ACTIONS"]
        );
        assert_eq!(column_widths().len(), Column::ALL.len());
    }
}
