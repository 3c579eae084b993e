use coursedir_client::review::Review;
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action},
    store::{Failure, Op, Store},
    styles::{self, error_text},
    widgets::StatefulList,
};

use super::load_status;

/// Reviews left for the selected school
#[derive(Debug, Default)]
pub struct ReviewsViewer {
    list: StatefulList,
    pending_delete: Option<String>,
}

fn stars(rating: Option<u8>) -> String {
    let rating = rating.unwrap_or(0).min(5) as usize;
    format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating))
}

fn review_item(review: &Review) -> ListItem<'static> {
    let published = if review.is_published.unwrap_or(false) {
        Span::raw("published").green()
    } else {
        Span::raw("hidden").gray()
    };

    ListItem::new(Line::from(vec![
        Span::raw(stars(review.rating)).yellow(),
        Span::raw(" "),
        Span::raw(review.title.clone()),
        Span::raw(" ("),
        published,
        Span::raw(")"),
    ]))
}

impl ReviewsViewer {
    fn selected_review<'a>(&self, store: &'a Store) -> Result<&'a Review, Failure> {
        let reviews = store.reviews().unwrap_or_default();
        self.list
            .selected()
            .and_then(|i| reviews.get(i))
            .ok_or_else(|| Failure::precondition("Select a review first."))
    }
}

impl Pane for ReviewsViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let Some(center) = store.selected_center() else {
            frame.render_widget(
                Paragraph::new("Select a school in the navigation pane to see its reviews."),
                area,
            );
            return;
        };

        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Min(0), Constraint::Length(3), Constraint::Length(1)],
        )
        .split(area);

        let Some(reviews) = store.reviews() else {
            frame.render_widget(Paragraph::new(load_status(store.reviews_failed())), layout[0]);
            return;
        };

        let list = List::new(reviews.iter().map(review_item))
            .highlight_style(styles::highlight())
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .title(format!("Reviews of {} ({})", center.name, reviews.len())),
            );
        self.list.render_to(frame, layout[0], list);

        if let Some(comment) = self
            .list
            .selected()
            .and_then(|i| reviews.get(i))
            .and_then(|r| r.comment.as_deref())
        {
            frame.render_widget(Paragraph::new(comment.to_string()), layout[1]);
        }

        frame.render_widget(
            Paragraph::new("p publish or hide, d delete, q back".gray()),
            layout[2],
        );
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };
        let pending = self.pending_delete.take();

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Char('p') => {
                let review = match self.selected_review(store) {
                    Ok(r) => r.clone(),
                    Err(f) => return Action::refused(Op::UpdateReview, f),
                };
                let published = review.is_published.unwrap_or(false);
                store.set_review_published(&review, !published);
            }
            KeyCode::Char('d') => {
                let review = match self.selected_review(store) {
                    Ok(r) => r.clone(),
                    Err(f) => return Action::refused(Op::DeleteReview, f),
                };
                if pending.as_deref() == Some(review.id.as_str()) {
                    store.delete_review(&review);
                } else {
                    let msg = format!("Press d again to delete \"{}\".", review.title);
                    self.pending_delete = Some(review.id);
                    return Action::Flash(error_text(msg));
                }
            }
            _ => (),
        };

        Action::None
    }
}
