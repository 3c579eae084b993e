use ratatui::{prelude::*, widgets::*};

/// Remembers the selected item of a list or table between draws
#[derive(Debug, Default)]
pub struct StatefulList {
    selected: Option<usize>,
    offset: usize,
    last_item_count: usize,
}

impl StatefulList {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn next(&mut self) {
        if self.last_item_count == 0 {
            return;
        }

        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.last_item_count => i + 1,
            _ => 0,
        });
    }

    pub fn previous(&mut self) {
        if self.last_item_count == 0 {
            return;
        }

        self.selected = Some(match self.selected {
            Some(0) | None => self.last_item_count - 1,
            Some(i) => i - 1,
        });
    }

    /// Keep the selection inside a list that may have shrunk
    fn set_item_count(&mut self, count: usize) {
        self.last_item_count = count;
        self.selected = match self.selected {
            _ if count == 0 => None,
            Some(i) if i >= count => Some(count - 1),
            None => Some(0),
            s => s,
        };
    }

    pub fn render_to(&mut self, frame: &mut Frame, target: Rect, list: List) {
        self.set_item_count(list.len());
        let mut state = ListState::default()
            .with_selected(self.selected)
            .with_offset(self.offset);
        frame.render_stateful_widget(list, target, &mut state);
        self.offset = state.offset();
    }

    /// Like [`Self::render_to`], but tables don't know how many rows they have.
    pub fn render_table_to(&mut self, frame: &mut Frame, target: Rect, table: Table, rows: usize) {
        self.set_item_count(rows);
        let mut state = TableState::default()
            .with_selected(self.selected)
            .with_offset(self.offset);
        frame.render_stateful_widget(table, target, &mut state);
        self.offset = state.offset();
    }
}
