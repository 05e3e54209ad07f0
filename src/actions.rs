// --- ENTITY ACTIONS ---

use web_sys::{Document, Element, HtmlInputElement};

use crate::config::recovery_cost;
use crate::dom;
use crate::error::Result;

pub const ACTION_RADIOS: &str = ".entity-actions input[type=\"radio\"]";
pub const HIDDEN_CLASS: &str = "action-hide";
pub const REVITALIZE_INPUTS: &str = ".revitalize-amount";

// radio -> label -> option list -> action panel -> entity card
const ENTITY_DEPTH: usize = 4;

/// Which of an entity's hideable inputs stay hidden once `radio_id` is
/// selected: everything except the inputs carrying the radio's id as a class.
pub fn hidden_after_select<S: AsRef<str>>(radio_id: &str, class_lists: &[Vec<S>]) -> Vec<bool> {
    class_lists
        .iter()
        .map(|classes| !classes.iter().any(|c| c.as_ref() == radio_id))
        .collect()
}

fn classes_of(el: &Element) -> Vec<String> {
    el.class_name().split_whitespace().map(str::to_string).collect()
}

/// Toggles `class_name` on each source's `target` element while hovered.
pub fn highlight_on_hover(document: &Document, selector: &str, class_name: &str) -> Result<()> {
    for source in dom::query_all::<Element>(document, selector)? {
        let target = source
            .get_attribute("target")
            .and_then(|id| document.get_element_by_id(&id));
        let Some(target) = target else {
            crate::warn(&format!("{} without a valid target", selector));
            continue;
        };

        let entered = target.clone();
        let class = class_name.to_string();
        dom::listen(&source, "mouseenter", move |_| Ok(entered.class_list().add_1(&class)?))?;

        let class = class_name.to_string();
        dom::listen(&source, "mouseleave", move |_| Ok(target.class_list().remove_1(&class)?))?;
    }
    Ok(())
}

pub fn show_only_selected_action(document: &Document) -> Result<()> {
    for radio in dom::query_all::<HtmlInputElement>(document, ACTION_RADIOS)? {
        let radio_id = radio.id();
        if radio_id.is_empty() {
            continue;
        }
        let Some(entity) = dom::ancestor(&radio, ENTITY_DEPTH) else {
            continue;
        };
        let hideable: Vec<Element> = dom::query_all_in(&entity, &format!(".{}", HIDDEN_CLASS))?;
        // Not a selector: ids may start with a digit.
        let controlled: Vec<Element> = dom::elements(&document.get_elements_by_class_name(&radio_id));

        dom::listen(&radio, "change", move |_| {
            let class_lists: Vec<Vec<String>> = hideable.iter().map(classes_of).collect();
            let hidden = hidden_after_select(&radio_id, &class_lists);
            for (el, hide) in hideable.iter().zip(hidden) {
                el.class_list().toggle_with_force(HIDDEN_CLASS, hide)?;
            }
            for el in &controlled {
                el.class_list().remove_1(HIDDEN_CLASS)?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Shows the resource cost next to each revitalize amount as it changes.
pub fn display_revitalize_cost(document: &Document, cost_table: &[u32]) -> Result<()> {
    for input in dom::query_all::<HtmlInputElement>(document, REVITALIZE_INPUTS)? {
        let table = cost_table.to_vec();
        let source = input.clone();
        dom::listen(&input, "change", move |_| {
            let cost = recovery_cost(&table, source.value_as_number()).map(|c| c.to_string());
            if let Some(label) = source.previous_element_sibling() {
                label.set_text_content(Some(cost.as_deref().unwrap_or("")));
            }
            Ok(())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_reveals_exactly_its_inputs() {
        let inputs = vec![
            vec!["uk_gov__attack", "action-hide"],
            vec!["uk_gov__transfer", "action-hide"],
            vec!["uk_gov__attack", "uk_gov__extra", "action-hide"],
            vec!["action-hide"],
        ];
        assert_eq!(
            hidden_after_select("uk_gov__attack", &inputs),
            vec![false, true, false, true]
        );
        assert_eq!(
            hidden_after_select("uk_gov__transfer", &inputs),
            vec![true, false, true, true]
        );
    }

    #[test]
    fn unknown_radio_hides_everything() {
        let inputs = vec![vec!["a"], vec!["b"]];
        assert_eq!(hidden_after_select("c", &inputs), vec![true, true]);
        assert!(hidden_after_select::<&str>("c", &[]).is_empty());
    }

    #[test]
    fn ids_that_are_not_css_identifiers_still_match() {
        let inputs = vec![vec!["7__attack", "action-hide"], vec!["7__transfer"]];
        assert_eq!(hidden_after_select("7__attack", &inputs), vec![false, true]);
    }

    #[test]
    fn class_match_is_exact() {
        let inputs = vec![vec!["uk_gov__attack-extra"]];
        assert_eq!(hidden_after_select("uk_gov__attack", &inputs), vec![true]);
    }
}
