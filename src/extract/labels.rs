//! Label-to-field dispatch tables for the two info blocks of a listing
//!
//! Each block is a list of `<li>` items whose label selects exactly one
//! record field. Labels missing from a table are ignored, so the site can
//! add or reorder attributes without breaking extraction.

use crate::extract::text::decimal_or_zero;
use crate::model::House;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Writes one extracted value into its destination field
pub type FieldSetter = fn(&mut House, String);

/// Unit suffix of the two area fields
pub const AREA_UNIT: &str = "㎡";

static BASE_INFO_FIELDS: Lazy<HashMap<&'static str, FieldSetter>> = Lazy::new(|| {
    table([
        ("房屋户型", |h, v| h.house_type = v),
        ("所在楼层", |h, v| h.floor = v),
        ("建筑面积", |h, v| h.gross_area = area_value("gross area", &v)),
        ("户型结构", |h, v| h.structure = v),
        ("套内面积", |h, v| h.net_area = area_value("net area", &v)),
        ("建筑类型", |h, v| h.building_type = v),
        ("房屋朝向", |h, v| h.orientation = v),
        ("建筑结构", |h, v| h.building_structure = v),
        ("装修情况", |h, v| h.decoration = v),
        ("梯户比例", |h, v| h.elevator_ratio = v),
        ("供暖方式", |h, v| h.heating_mode = v),
        ("配备电梯", |h, v| h.elevator = v),
    ])
});

static TRANSACTION_INFO_FIELDS: Lazy<HashMap<&'static str, FieldSetter>> = Lazy::new(|| {
    table([
        ("挂牌时间", |h, v| h.listing_time = v),
        ("交易权属", |h, v| h.transaction = v),
        ("上次交易", |h, v| h.last_transaction_time = v),
        ("房屋用途", |h, v| h.usage = v),
        ("房屋年限", |h, v| h.year = v),
        ("产权所属", |h, v| h.property = v),
        ("抵押信息", |h, v| h.mortgage = v),
        ("房本备件", |h, v| h.property_cert = v),
    ])
});

fn table<const N: usize>(
    entries: [(&'static str, FieldSetter); N],
) -> HashMap<&'static str, FieldSetter> {
    entries.into_iter().collect()
}

/// Strips the area unit and parses the rest; zero on failure
fn area_value(field: &'static str, value: &str) -> f64 {
    decimal_or_zero(field, &value.replace(AREA_UNIT, ""))
}

/// Applies a base-info item to the record
///
/// Returns false, leaving the record untouched, for unknown labels.
pub fn apply_base_info(house: &mut House, label: &str, value: String) -> bool {
    apply(&BASE_INFO_FIELDS, house, label, value)
}

/// Applies a transaction-info item to the record
///
/// Returns false, leaving the record untouched, for unknown labels.
pub fn apply_transaction_info(house: &mut House, label: &str, value: String) -> bool {
    apply(&TRANSACTION_INFO_FIELDS, house, label, value)
}

fn apply(
    fields: &HashMap<&'static str, FieldSetter>,
    house: &mut House,
    label: &str,
    value: String,
) -> bool {
    match fields.get(label) {
        Some(setter) => {
            setter(house, value);
            true
        }
        None => {
            tracing::trace!("Ignoring unknown label '{}'", label);
            false
        }
    }
}
