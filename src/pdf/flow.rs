//! Two-column flow: one cursor per page, two independently advancing columns.

use crate::fonts::FontSet;

use super::Document;
use super::page::PageFactory;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    fn index(self) -> usize {
        match self {
            Column::Left => 0,
            Column::Right => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Column::Left => Column::Right,
            Column::Right => Column::Left,
        }
    }
}

/// Outcome of a space request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpaceDecision {
    Fits,
    SwitchedColumn,
    /// Neither column has room; the caller must start a new page.
    PageBreak,
}

/// Column placement, computed once per document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnGeometry {
    pub x: [f32; 2],
    pub width: f32,
    /// First content line, just below the header chrome.
    pub top: f32,
    /// Lowest y any content may reach.
    pub bottom: f32,
}

impl ColumnGeometry {
    pub fn new(page_width: f32, side_margin: f32, gutter: f32, top: f32, bottom: f32) -> Self {
        let width = (page_width - 2.0 * side_margin - gutter) / 2.0;
        Self {
            x: [side_margin, side_margin + width + gutter],
            width,
            top,
            bottom,
        }
    }

    pub fn capacity(&self) -> f32 {
        self.top - self.bottom
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutCursor {
    geometry: ColumnGeometry,
    active: Column,
    y: [f32; 2],
}

impl LayoutCursor {
    pub fn new(geometry: ColumnGeometry) -> Self {
        Self {
            geometry,
            active: Column::Left,
            y: [geometry.top; 2],
        }
    }

    pub fn geometry(&self) -> &ColumnGeometry {
        &self.geometry
    }

    pub fn active(&self) -> Column {
        self.active
    }

    pub fn x(&self) -> f32 {
        self.geometry.x[self.active.index()]
    }

    pub fn y(&self) -> f32 {
        self.y[self.active.index()]
    }

    pub fn y_of(&self, column: Column) -> f32 {
        self.y[column.index()]
    }

    pub fn width(&self) -> f32 {
        self.geometry.width
    }

    pub fn remaining(&self, column: Column) -> f32 {
        self.y[column.index()] - self.geometry.bottom
    }

    /// Height of an empty column.
    pub fn capacity(&self) -> f32 {
        self.geometry.capacity()
    }

    pub fn is_at_top(&self) -> bool {
        self.y() >= self.geometry.top
    }

    pub fn ensure_space(&mut self, height: f32) -> SpaceDecision {
        self.ensure_space_in(height, self.active)
    }

    /// Make `column` (or failing that, the other one) the active column if it can take
    /// `height` more points. Nothing changes on [`SpaceDecision::PageBreak`].
    pub fn ensure_space_in(&mut self, height: f32, column: Column) -> SpaceDecision {
        if self.remaining(column) >= height {
            self.active = column;
            return SpaceDecision::Fits;
        }
        let other = column.other();
        if self.remaining(other) >= height {
            self.active = other;
            return SpaceDecision::SwitchedColumn;
        }
        SpaceDecision::PageBreak
    }

    /// Activate whichever column has more room left; ties go to the left column.
    pub fn alternate_column(&mut self) -> Column {
        self.active = if self.remaining(Column::Right) > self.remaining(Column::Left) {
            Column::Right
        } else {
            Column::Left
        };
        self.active
    }

    pub fn advance(&mut self, dy: f32) {
        self.y[self.active.index()] -= dy;
    }
}

/// Everything a block renderer touches: measurement, the page list, the page factory and
/// the cursor of the current page.
pub struct FlowContext<'a> {
    pub fonts: &'a FontSet,
    pub doc: &'a mut Document,
    pub pages: &'a PageFactory,
    pub cursor: LayoutCursor,
}

impl<'a> FlowContext<'a> {
    /// Open the first page.
    pub fn start(fonts: &'a FontSet, doc: &'a mut Document, pages: &'a PageFactory) -> Self {
        let cursor = pages.new_page(doc, fonts);
        Self {
            fonts,
            doc,
            pages,
            cursor,
        }
    }

    /// Request `height` in the active column, switching column or page as needed.
    pub fn ensure_space(&mut self, height: f32) {
        match self.cursor.ensure_space(height) {
            SpaceDecision::Fits => {}
            SpaceDecision::SwitchedColumn => {
                log::debug!("flow: switched to {:?} column for {height:.1}pt", self.cursor.active());
            }
            SpaceDecision::PageBreak => {
                self.cursor = self.pages.new_page(self.doc, self.fonts);
                log::debug!("flow: page break → page {}", self.doc.page_count());
                if height > self.cursor.capacity() {
                    log::warn!("flow: block of {height:.1}pt is taller than an empty column");
                }
            }
        }
    }

    pub fn alternate_column(&mut self) {
        self.cursor.alternate_column();
    }
}
