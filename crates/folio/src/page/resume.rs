//! The content of the résumé and how it's laid out into rows of text.

use crate::page::scroll::Bounds;

/// Everything on the page.
#[derive(serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct Resume {
    /// Whose résumé it is
    pub name: String,
    /// What they do
    pub title: String,
    /// A sentence or two introducing them
    pub summary: String,
    /// The sections, in order
    pub sections: Vec<Section>,
}

/// A section of the page that can be linked to.
#[derive(serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct Section {
    /// Used for anchors, eg `#experience`
    pub id: String,
    /// Heading
    pub title: String,
    /// Body text, one entry per row
    pub lines: Vec<String>,
    /// Skill cards, shown after the text
    pub cards: Vec<String>,
}

/// What a row of the page is for, which decides how it's drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RowKind {
    /// Nothing, just spacing
    Blank,
    /// The big name at the top
    Name,
    /// The job title under the name
    Title,
    /// The introduction
    Summary,
    /// A section's heading
    Heading,
    /// A line of a section's body
    Text,
    /// A skill card, numbered across the whole page
    Card(usize),
}

/// A single terminal row's worth of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Row {
    /// What's written
    pub text: String,
    /// What it's for
    pub kind: RowKind,
    /// The index of the section that the row belongs to
    pub section: Option<usize>,
}

impl Row {
    /// Instantiate
    fn new(text: &str, kind: RowKind, section: Option<usize>) -> Self {
        Self {
            text: text.to_owned(),
            kind,
            section,
        }
    }
}

/// The résumé laid out into rows.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Layout {
    /// Every row, from the top of the page
    pub rows: Vec<Row>,
    /// The id and position of every section
    pub sections: Vec<(String, Bounds)>,
    /// The height of a row in page pixels
    pub row_height: f32,
    /// The total number of skill cards
    pub card_count: usize,
}

impl Layout {
    /// Lay out the résumé. The first row is left empty for the page's header.
    #[must_use]
    pub fn new(resume: &Resume, row_height: f32) -> Self {
        let mut rows = vec![
            Row::new("", RowKind::Blank, None),
            Row::new(&resume.name, RowKind::Name, None),
            Row::new(&resume.title, RowKind::Title, None),
            Row::new("", RowKind::Blank, None),
        ];
        if !resume.summary.is_empty() {
            rows.push(Row::new(&resume.summary, RowKind::Summary, None));
            rows.push(Row::new("", RowKind::Blank, None));
        }

        let mut sections = Vec::new();
        let mut card_count = 0;
        for (index, section) in resume.sections.iter().enumerate() {
            let first_row = rows.len();
            let owner = Some(index);
            rows.push(Row::new(&section.title, RowKind::Heading, owner));
            rows.push(Row::new("", RowKind::Blank, owner));
            for line in &section.lines {
                rows.push(Row::new(line, RowKind::Text, owner));
            }
            for card in &section.cards {
                rows.push(Row::new(card, RowKind::Card(card_count), owner));
                card_count += 1;
            }
            rows.push(Row::new("", RowKind::Blank, owner));

            let bounds = Bounds::new(
                rows_to_pixels(first_row, row_height),
                rows_to_pixels(rows.len() - first_row, row_height),
            );
            sections.push((section.id.clone(), bounds));
        }

        Self {
            rows,
            sections,
            row_height,
            card_count,
        }
    }

    /// The height of the whole page in page pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        rows_to_pixels(self.rows.len(), self.row_height)
    }

    /// The anchor of the nth section, eg `#skills`.
    #[must_use]
    pub fn anchor(&self, index: usize) -> Option<String> {
        self.sections.get(index).map(|(id, _)| format!("#{id}"))
    }

    /// The ids and positions of all the sections.
    pub fn section_bounds(&self) -> impl Iterator<Item = (&str, Bounds)> {
        self.sections
            .iter()
            .map(|(id, bounds)| (id.as_str(), *bounds))
    }
}

/// Convert a number of rows to page pixels.
fn rows_to_pixels(rows: usize, row_height: f32) -> f32 {
    f32::from(u16::try_from(rows).unwrap_or(u16::MAX)) * row_height
}
