//! House stage extractor: one listing detail page to one record

use crate::extract::labels::{apply_base_info, apply_transaction_info};
use crate::extract::text::{
    decimal_or_zero, element_text, joined_text, remove_comma, remove_space, set_null,
};
use crate::extract::{ExtractError, Selectors};
use crate::model::House;
use scraper::{ElementRef, Html, Selector};

/// Builds a fully populated record from a listing detail page
///
/// Missing or malformed values never abort the record: they are logged and
/// the affected fields keep their defaults. The `id` is left at zero for the
/// sink to assign.
///
/// # Arguments
///
/// * `document` - The parsed detail page
/// * `selectors` - Compiled selectors
/// * `url` - The detail URL the page was fetched from
pub fn extract_house(document: &Html, selectors: &Selectors, url: &str) -> House {
    let text_of = |selector: &Selector| joined_text(document.select(selector));

    let total_price_unit = text_of(&selectors.total_price_unit);
    let unit_price_unit = text_of(&selectors.unit_price_unit);

    // The unit is rendered inside the unit price element
    let unit_price_raw = text_of(&selectors.unit_price).replace(unit_price_unit.as_str(), "");

    let mut house = House {
        title: remove_comma(&text_of(&selectors.title)),
        url: url.to_string(),
        total_price: decimal_or_zero("total price", &text_of(&selectors.total_price)),
        total_price_unit,
        unit_price: decimal_or_zero("unit price", &unit_price_raw),
        unit_price_unit,
        community: text_of(&selectors.community),
        ..House::default()
    };

    let location = text_of(&selectors.location);
    match split_location(&location) {
        Ok((area, sub_area, ring_road)) => {
            house.area = area;
            house.sub_area = sub_area;
            house.ring_road = ring_road;
        }
        Err(e) => tracing::warn!("{} on {}", e, url),
    }

    for item in document.select(&selectors.base_items) {
        let label = remove_comma(&joined_text(item.select(&selectors.label)));
        let value = base_info_value(&item, &label);
        apply_base_info(&mut house, &label, value);
    }

    for item in document.select(&selectors.transaction_items) {
        let label = remove_space(&joined_text(item.select(&selectors.label)));
        let content = remove_space(&joined_text(item.select(&selectors.span)));
        let value = set_null(&content.replace(label.as_str(), ""));
        apply_transaction_info(&mut house, &label, value);
    }

    house
}

/// Item text with its label removed, sentinel mapped to empty
fn base_info_value(item: &ElementRef<'_>, label: &str) -> String {
    let text = element_text(item);
    let value = if label.is_empty() {
        text
    } else {
        text.replace(label, "")
    };
    set_null(value.trim())
}

/// Splits a location string into area, sub-area and ring road
///
/// Tokens are whitespace separated and mapped by position; missing trailing
/// tokens are empty.
///
/// # Errors
///
/// Returns `ExtractError::LocationFormat` for zero or more than three tokens.
///
/// # Example
///
/// ```
/// use lianjia_harvest::extract::split_location;
///
/// let (area, sub_area, ring_road) = split_location("东城 安定门 二至三环").unwrap();
/// assert_eq!(area, "东城");
/// assert_eq!(sub_area, "安定门");
/// assert_eq!(ring_road, "二至三环");
/// ```
pub fn split_location(raw: &str) -> Result<(String, String, String), ExtractError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > 3 {
        return Err(ExtractError::LocationFormat {
            raw: raw.to_string(),
            tokens: tokens.len(),
        });
    }

    let token = |i: usize| tokens.get(i).map(|t| t.to_string()).unwrap_or_default();
    Ok((token(0), token(1), token(2)))
}
