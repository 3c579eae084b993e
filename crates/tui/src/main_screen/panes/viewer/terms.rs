use coursedir_client::taxonomy::{TaxonomyKind, Term};
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    widgets::{Block, Borders, List, Paragraph},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action},
    store::{Failure, Op, Store},
    styles::{self, error_text},
    widgets::{Prompt, PromptEvent, StatefulList},
};

use super::load_status;

/// One lookup list, like categories or locations
#[derive(Debug)]
pub struct TermsViewer {
    kind: TaxonomyKind,
    list: StatefulList,
    add_prompt: Option<Prompt>,
    pending_delete: Option<String>,
}

impl TermsViewer {
    pub fn new(kind: TaxonomyKind) -> Self {
        Self {
            kind,
            list: StatefulList::default(),
            add_prompt: None,
            pending_delete: None,
        }
    }

    pub fn prompting(&self) -> bool {
        self.add_prompt.is_some()
    }

    fn selected_term<'a>(&self, store: &'a Store) -> Result<&'a Term, Failure> {
        let terms = store.terms(self.kind).unwrap_or_default();
        self.list
            .selected()
            .and_then(|i| terms.get(i))
            .ok_or_else(|| Failure::precondition("Select an entry first."))
    }

    fn add(&mut self, store: &mut Store, event: Event) -> Action {
        let (Some(prompt), Event::Key(key)) = (&mut self.add_prompt, event) else {
            return Action::None;
        };

        match prompt.handle_key(key) {
            PromptEvent::None => Action::None,
            PromptEvent::Cancel => {
                self.add_prompt = None;
                Action::None
            }
            PromptEvent::Submit(name) => match store.create_term(self.kind, &name) {
                Ok(()) => {
                    self.add_prompt = None;
                    Action::None
                }
                // keep the prompt so the name can be fixed
                Err(f) => Action::refused(Op::CreateTerm, f),
            },
        }
    }
}

impl Pane for TermsViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Min(0), Constraint::Length(1)],
        )
        .split(area);

        match store.terms(self.kind) {
            None => frame.render_widget(
                Paragraph::new(load_status(store.terms_failed(self.kind))),
                layout[0],
            ),
            Some(terms) => {
                let list = List::new(terms.iter().map(|t| t.name.clone()))
                    .highlight_style(styles::highlight())
                    .block(
                        Block::default()
                            .borders(Borders::BOTTOM)
                            .title(format!("{} ({})", self.kind.title(), terms.len())),
                    );
                self.list.render_to(frame, layout[0], list);
            }
        }

        frame.render_widget(Paragraph::new("a add, d delete, q back".gray()), layout[1]);

        if let Some(prompt) = &self.add_prompt {
            prompt.draw(frame, area);
        }
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        if self.add_prompt.is_some() {
            return self.add(store, event);
        }

        let Event::Key(key) = event else {
            return Action::None;
        };
        let pending = self.pending_delete.take();

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Char('a') => {
                if store.terms(self.kind).is_none() {
                    return Action::refused(
                        Op::CreateTerm,
                        Failure::precondition("Wait for the list to load."),
                    );
                }
                self.add_prompt = Some(Prompt::new(format!("Add to {}", self.kind.title())));
            }
            KeyCode::Char('d') => {
                let term = match self.selected_term(store) {
                    Ok(t) => t.clone(),
                    Err(f) => return Action::refused(Op::DeleteTerm, f),
                };
                if pending.as_deref() == Some(term.id.as_str()) {
                    store.delete_term(self.kind, &term);
                } else {
                    let msg = format!("Press d again to delete {}.", term.name);
                    self.pending_delete = Some(term.id);
                    return Action::Flash(error_text(msg));
                }
            }
            _ => (),
        };

        Action::None
    }
}
