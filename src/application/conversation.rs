//! Opens a contact's conversation from the chat list.

use crate::domain::{AppError, DocumentQuery, Result, SelectorConfig};

use super::boundary::find_text;

/// Searches for `contact` and opens the first chat whose title contains it.
///
/// # Errors
/// Returns `ElementMissing` if the search box is absent, `ContactNotFound`
/// if no chat matches, or any fatal session error.
pub fn open_conversation<Q: DocumentQuery>(
    query: &mut Q,
    selectors: &SelectorConfig,
    contact: &str,
) -> Result<()> {
    let search_box = query
        .find_by_class(&selectors.search_box_class)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::ElementMissing {
            class: selectors.search_box_class.clone(),
        })?;

    query.click(&search_box)?;
    query.type_text(&search_box, contact)?;

    let chat = find_text(query, contact)?.ok_or_else(|| AppError::ContactNotFound {
        name: contact.to_string(),
    })?;
    query.click(&chat)?;

    tracing::info!(contact, "Opened conversation");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::scripted_page::{PageNode, ScriptedPage};

    #[test]
    fn test_opens_matching_chat() {
        let mut page = ScriptedPage::new().contact("Alice Smith");
        let selectors = page.selectors().clone();

        open_conversation(&mut page, &selectors, "Alice").unwrap();

        assert_eq!(page.typed, vec!["Alice".to_string()]);
        assert_eq!(
            page.clicks,
            vec![PageNode::SearchBox, PageNode::Text("Alice Smith".into())]
        );
    }

    #[test]
    fn test_unknown_contact() {
        let mut page = ScriptedPage::new().contact("Bob");
        let selectors = page.selectors().clone();

        let err = open_conversation(&mut page, &selectors, "Alice").unwrap_err();

        assert!(matches!(err, AppError::ContactNotFound { ref name } if name == "Alice"));
    }

    #[test]
    fn test_missing_search_box() {
        let mut page = ScriptedPage::new().without_search_box();
        let selectors = page.selectors().clone();

        let err = open_conversation(&mut page, &selectors, "Alice").unwrap_err();

        assert!(matches!(err, AppError::ElementMissing { .. }));
    }
}
