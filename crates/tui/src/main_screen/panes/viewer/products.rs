use coursedir_client::product::{CreateProductInput, Product};
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};
use serde_json::Value;

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action, Document},
    store::{Failure, Op, Store},
    styles::{self, error_text},
    widgets::{Field, FieldKind, Form, FormEvent, StatefulList},
};

use super::load_status;

/// The product catalogue, which isn't tied to any school
#[derive(Debug, Default)]
pub struct ProductsViewer {
    list: StatefulList,
    pending_delete: Option<String>,
}

impl ProductsViewer {
    fn selected_product<'a>(&self, store: &'a Store) -> Result<&'a Product, Failure> {
        let products = store.products().unwrap_or_default();
        self.list
            .selected()
            .and_then(|i| products.get(i))
            .ok_or_else(|| Failure::precondition("Select a product first."))
    }
}

impl Pane for ProductsViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Min(0), Constraint::Length(1)],
        )
        .split(area);

        match store.products() {
            None => frame.render_widget(
                Paragraph::new(load_status(store.products_failed())),
                layout[0],
            ),
            Some(products) => {
                let rows: Vec<Row> = products
                    .iter()
                    .map(|p| {
                        Row::new(vec![
                            p.name.clone(),
                            p.price.map(|n| n.to_string()).unwrap_or_default(),
                            p.description.clone().unwrap_or_default(),
                        ])
                    })
                    .collect();
                let count = rows.len();
                let table = Table::new(
                    rows,
                    [
                        Constraint::Percentage(30),
                        Constraint::Length(9),
                        Constraint::Min(10),
                    ],
                )
                .header(Row::new(["Name", "Price", "Description"]).style(styles::header()))
                .highlight_style(styles::highlight())
                .block(
                    Block::default()
                        .borders(Borders::BOTTOM)
                        .title(format!("Products ({})", count)),
                );
                self.list.render_table_to(frame, layout[0], table, count);
            }
        }

        frame.render_widget(Paragraph::new("a add, d delete, q back".gray()), layout[1]);
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };
        let pending = self.pending_delete.take();

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Char('a') => return Action::Show(Document::NewProduct),
            KeyCode::Char('d') => {
                let product = match self.selected_product(store) {
                    Ok(p) => p.clone(),
                    Err(f) => return Action::refused(Op::DeleteProduct, f),
                };
                if pending.as_deref() == Some(product.id.as_str()) {
                    store.delete_product(&product);
                } else {
                    let msg = format!("Press d again to delete {}.", product.name);
                    self.pending_delete = Some(product.id);
                    return Action::Flash(error_text(msg));
                }
            }
            _ => (),
        };

        Action::None
    }
}

/// Adds a product to the catalogue
pub struct ProductForm {
    form: Form,
}

impl ProductForm {
    pub fn new() -> Self {
        Self {
            form: Form::new(
                "New product",
                vec![
                    Field::new("name", "Name", FieldKind::Text),
                    Field::new("price", "Price", FieldKind::Number),
                    Field::new("description", "Description", FieldKind::Text),
                ],
            ),
        }
    }

    fn submit(&self, store: &mut Store) -> Result<(), Failure> {
        let mut values = self.form.to_json()?;
        values.retain(|_, v| !v.is_null());
        let input: CreateProductInput = serde_json::from_value(Value::Object(values))
            .map_err(|e| Failure::precondition(format!("Invalid product: {}", e)))?;
        store.create_product(input)
    }
}

impl Pane for ProductForm {
    fn draw(&mut self, _: &Store, frame: &mut Frame, area: Rect) {
        self.form.draw(frame, area);
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        match self.form.handle_key(key) {
            FormEvent::None => Action::None,
            FormEvent::Cancel => Action::Show(Document::Products),
            FormEvent::Submit => match self.submit(store) {
                Ok(()) => Action::None,
                Err(f) => Action::refused(Op::CreateProduct, f),
            },
        }
    }
}
