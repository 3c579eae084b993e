use crossterm::event::KeyCode;
use log::error;
use ratatui::{prelude::Rect, text::Text, widgets::Paragraph, Frame};
use tui_tree_widget::{Tree, TreeItem, TreeState};

use super::{Action, Document, Pane};
use crate::{
    event::Event,
    store::{Failure, Op, Store},
    styles::error_text,
};

mod tree;
use tree::*;

/// The navigation pane, which shows the schools and everything else there is to manage
#[derive(Debug, Default)]
pub struct Navigation {
    tree_state: TreeState<TreeId>,
    cached_view_tree: Vec<TreeItem<'static, TreeId>>,

    /// The store revision the tree was built from
    built_from: Option<u64>,

    /// School that will be deleted if `d` is pressed again
    pending_delete: Option<String>,
}

impl Pane for Navigation {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        self.refresh_tree(store);

        match Tree::new(self.cached_view_tree.clone()) {
            Ok(tree) => {
                frame.render_stateful_widget(tree.highlight_symbol(">>"), area, &mut self.tree_state)
            }
            Err(e) => {
                error!("error rendering tree: {}", e);
                frame.render_widget(Paragraph::new(error_text("Couldn't draw the tree.")), area)
            }
        }
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };
        let pending_delete = self.pending_delete.take();

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                return Action::Exit;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.tree_state.key_down(&self.cached_view_tree);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.tree_state.key_up(&self.cached_view_tree);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.tree_state.key_left();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.tree_state.key_right();
            }
            KeyCode::Enter | KeyCode::Tab => {
                let sel = self.tree_state.selected();
                match sel.last() {
                    Some(TreeId::Help) => return Action::Show(Document::Welcome),
                    Some(TreeId::School(id)) => {
                        store.select_center(id);
                        return Action::Show(Document::Courses);
                    }
                    Some(TreeId::Reviews) => return Action::Show(Document::Reviews),
                    Some(TreeId::Products) => return Action::Show(Document::Products),
                    Some(TreeId::Taxonomy(kind)) => return Action::Show(Document::Terms(*kind)),
                    Some(TreeId::Schools | TreeId::Taxonomies) => {
                        self.tree_state.toggle(sel.clone());
                    }
                    Some(TreeId::Loading) | None => (),
                }
            }
            KeyCode::Char('r') => {
                store.fetch_all();
                return Action::Flash(Text::raw("Reloading..."));
            }
            KeyCode::Char('n') => return Action::Show(Document::NewCenter),
            KeyCode::Char('e') => match self.highlighted_center(store) {
                Ok(center) => return Action::Show(Document::EditCenter(center)),
                Err(f) => return Action::refused(Op::UpdateCenter, f),
            },
            KeyCode::Char('d') => match self.highlighted_center(store) {
                Ok(center) if pending_delete.as_deref() == Some(center.id.as_str()) => {
                    store.delete_center(&center);
                }
                Ok(center) => {
                    let msg = format!("Press d again to delete {} and its logo.", center.name);
                    self.pending_delete = Some(center.id);
                    return Action::Flash(error_text(msg));
                }
                Err(f) => return Action::refused(Op::DeleteCenter, f),
            },
            KeyCode::Char('o') => {
                if let Err(f) = self
                    .highlighted_center(store)
                    .and_then(|c| store.open_logo(&c))
                {
                    return Action::refused(Op::OpenLogo, f);
                }
            }
            _ => (),
        };

        Action::None
    }
}

impl Navigation {
    /// Rebuild the tree if the store has changed since we last did
    fn refresh_tree(&mut self, store: &Store) {
        if self.built_from == Some(store.revision()) {
            return;
        }

        let first_build = self.built_from.is_none();
        self.cached_view_tree = build(store);
        self.built_from = Some(store.revision());

        if first_build {
            self.tree_state.select(vec![TreeId::Help]);
            self.tree_state.open(vec![TreeId::Schools]);
        } else if let Some(TreeId::School(id)) = self.tree_state.selected().last() {
            // the highlighted school may have just been deleted
            if store.center(id).is_none() {
                self.tree_state.select(vec![TreeId::Schools]);
            }
        }
    }

    /// The school under the cursor
    fn highlighted_center(
        &self,
        store: &Store,
    ) -> Result<coursedir_client::center::LearningCenter, Failure> {
        match self.tree_state.selected().last() {
            Some(TreeId::School(id)) => store
                .center(id)
                .cloned()
                .ok_or_else(|| Failure::precondition("That school no longer exists.")),
            _ => Err(Failure::precondition("Highlight a school first.")),
        }
    }
}
