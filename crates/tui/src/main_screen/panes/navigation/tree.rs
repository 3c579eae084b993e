use coursedir_client::taxonomy::TaxonomyKind;
use log::error;
use ratatui::text::Text;
use tui_tree_widget::TreeItem;

use crate::store::Store;

/// Identifies a specific item in the tree. Used for selection, etc.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TreeId {
    #[default]
    Help,
    Schools,
    School(String),
    Reviews,
    Products,
    Taxonomies,
    Taxonomy(TaxonomyKind),

    /// A placeholder while the schools are loading
    Loading,
}

/// Compile the tree from what's in the store
pub fn build(store: &Store) -> Vec<TreeItem<'static, TreeId>> {
    let schools = if store.loaded() {
        let selected = store.selected_center().map(|c| c.id.as_str());
        let mut centers: Vec<_> = store.centers().iter().collect();
        centers.sort_by_key(|c| c.name.to_lowercase());
        centers
            .into_iter()
            .map(|c| {
                let marker = if Some(c.id.as_str()) == selected {
                    "● "
                } else {
                    ""
                };
                TreeItem::new_leaf(
                    TreeId::School(c.id.clone()),
                    format!("{}{}", marker, display_name(&c.name)),
                )
            })
            .collect()
    } else {
        vec![TreeItem::new_leaf(TreeId::Loading, "Loading...")]
    };

    let taxonomies = TaxonomyKind::ALL
        .iter()
        .map(|k| TreeItem::new_leaf(TreeId::Taxonomy(*k), k.title()))
        .collect();

    vec![
        TreeItem::new_leaf(TreeId::Help, "Help"),
        node(TreeId::Schools, "Schools", schools),
        TreeItem::new_leaf(TreeId::Reviews, "Reviews"),
        TreeItem::new_leaf(TreeId::Products, "Products"),
        node(TreeId::Taxonomies, "Lookup lists", taxonomies),
    ]
}

fn display_name(name: &str) -> &str {
    match name.trim() {
        "" => "(unnamed)",
        n => n,
    }
}

/// A node with children. Duplicate ids are a bug in the backend's data, so we'd rather show the
/// node empty than not at all.
fn node(
    id: TreeId,
    text: &'static str,
    children: Vec<TreeItem<'static, TreeId>>,
) -> TreeItem<'static, TreeId> {
    match TreeItem::new(id.clone(), Text::from(text), children) {
        Ok(item) => item,
        Err(e) => {
            error!("error building tree under {:?}: {}", id, e);
            TreeItem::new_leaf(id, text)
        }
    }
}
