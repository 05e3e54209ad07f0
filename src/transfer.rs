//! Transfer amounts sharing one entity's budget.
//!
//! Every input whose class contains `__transfer-input` belongs to the entity
//! named by the class prefix. Raising one input lowers the `max` of its
//! siblings by the same amount, so together they never exceed the budget the
//! server rendered into each `max`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use web_sys::{Document, HtmlInputElement};

use crate::dom;
use crate::error::Result;

pub const TRANSFER_SELECTOR: &str = "[class*=__transfer-input]";

/// `"uk_gov__transfer-input"` -> `"uk_gov"`.
pub fn entity_prefix(class_name: &str) -> &str {
    class_name.split("__").next().unwrap_or(class_name)
}

/// Groups input positions by entity, keeping document order within a group.
pub fn group_by_entity<'a, I>(class_names: I) -> BTreeMap<String, Vec<usize>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, class_name) in class_names.into_iter().enumerate() {
        groups.entry(entity_prefix(class_name).to_string()).or_default().push(index);
    }
    groups
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferGroup {
    values: Vec<f64>,
    maxes: Vec<Option<f64>>,
}

impl TransferGroup {
    pub fn new<I>(slots: I) -> TransferGroup
    where
        I: IntoIterator<Item = (f64, Option<f64>)>,
    {
        let (values, maxes) = slots.into_iter().unzip();
        TransferGroup { values, maxes }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max(&self, index: usize) -> Option<f64> {
        self.maxes.get(index).copied().flatten()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Records a new value for one input and returns the change applied to
    /// every sibling's maximum.
    pub fn change(&mut self, index: usize, value: f64) -> Option<f64> {
        let previous = self.values.get_mut(index)?;
        let delta = value - *previous;
        *previous = value;
        for (i, max) in self.maxes.iter_mut().enumerate() {
            if i == index {
                continue;
            }
            if let Some(max) = max {
                *max -= delta;
            }
        }
        Some(delta)
    }
}

fn number_or(raw: Option<String>, fallback: f64) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(fallback)
}

pub fn limit_transfer_amounts(document: &Document) -> Result<()> {
    let inputs: Vec<HtmlInputElement> = dom::query_all(document, TRANSFER_SELECTOR)?;
    let class_names: Vec<String> = inputs.iter().map(|input| input.class_name()).collect();

    for positions in group_by_entity(class_names.iter().map(String::as_str)).into_values() {
        let members: Vec<HtmlInputElement> = positions.iter().map(|&i| inputs[i].clone()).collect();
        let group = TransferGroup::new(members.iter().map(|input| {
            let value = number_or(input.dataset().get("value"), 0.0);
            let max = Some(number_or(Some(input.max()), f64::NAN)).filter(|m| m.is_finite());
            (value, max)
        }));
        let group = Rc::new(RefCell::new(group));
        let members = Rc::new(members);

        for (index, input) in members.iter().enumerate() {
            let group = group.clone();
            let members = members.clone();
            let source = input.clone();
            dom::listen(input, "change", move |_event| {
                let value = number_or(Some(source.value()), 0.0);
                let mut group = group.borrow_mut();
                group.change(index, value);
                source.dataset().set("value", &dom::format_number(value))?;
                for (i, sibling) in members.iter().enumerate() {
                    if i == index {
                        continue;
                    }
                    if let Some(max) = group.max(i) {
                        sibling.set_max(&dom::format_number(max));
                    }
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_text_before_double_underscore() {
        assert_eq!(entity_prefix("uk_gov__transfer-input"), "uk_gov");
        assert_eq!(entity_prefix("plain"), "plain");
        assert_eq!(entity_prefix(""), "");
    }

    #[test]
    fn inputs_group_by_entity_in_document_order() {
        let groups = group_by_entity([
            "plc__transfer-input",
            "scs__transfer-input",
            "plc__transfer-input",
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["plc"], vec![0, 2]);
        assert_eq!(groups["scs"], vec![1]);
    }

    #[test]
    fn change_lowers_sibling_maxima_by_the_delta() {
        let mut group = TransferGroup::new([(0.0, Some(10.0)), (0.0, Some(10.0)), (0.0, Some(10.0))]);
        assert_eq!(group.change(0, 4.0), Some(4.0));
        assert_eq!(group.max(0), Some(10.0));
        assert_eq!(group.max(1), Some(6.0));
        assert_eq!(group.max(2), Some(6.0));

        assert_eq!(group.change(1, 6.0), Some(6.0));
        assert_eq!(group.max(0), Some(4.0));
        assert_eq!(group.max(2), Some(0.0));

        assert_eq!(group.change(0, 1.0), Some(-3.0));
        assert_eq!(group.max(1), Some(9.0));
        assert_eq!(group.max(2), Some(3.0));
        assert_eq!(group.total(), 7.0);
    }

    #[test]
    fn total_stays_within_budget_when_each_input_respects_its_max() {
        let budget = 12.0;
        let mut group = TransferGroup::new(vec![(0.0, Some(budget)); 4]);
        for (index, wanted) in [(0, 5.0), (2, 9.0), (3, 3.0), (1, 8.0), (2, 1.0), (1, 8.0)] {
            let allowed = group.max(index).unwrap().min(wanted);
            group.change(index, allowed);
            assert!(group.total() <= budget);
        }
    }

    #[test]
    fn unbounded_inputs_stay_unbounded() {
        let mut group = TransferGroup::new([(2.0, None), (0.0, Some(5.0))]);
        group.change(0, 3.0);
        assert_eq!(group.max(0), None);
        assert_eq!(group.max(1), Some(4.0));
        assert_eq!(group.change(7, 1.0), None);
    }

    #[test]
    fn unreadable_numbers_fall_back() {
        assert_eq!(number_or(Some("3".into()), 0.0), 3.0);
        assert_eq!(number_or(Some("".into()), 0.0), 0.0);
        assert_eq!(number_or(None, 1.0), 1.0);
        assert_eq!(number_or(Some("inf".into()), 2.0), 2.0);
    }
}
