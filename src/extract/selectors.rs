use crate::HarvestError;
use scraper::Selector;

const AREA_LINKS: &str = "div[data-role='ershoufang'] a";
const SUB_AREA_LINKS: &str = "div[data-role='ershoufang'] > div:nth-child(2) a";
const PAGE_BOX: &str = "div.page-box.house-lst-page-box";
const LISTING_LINKS: &str = "div.content > div.leftContent > ul.sellListContent li > a";

const TITLE: &str = "div.title > h1";
const TOTAL_PRICE: &str = "div.price > span.total";
const TOTAL_PRICE_UNIT: &str = "div.price > span.unit";
const UNIT_PRICE: &str = "div.unitPrice > span.unitPriceValue";
const UNIT_PRICE_UNIT: &str = "div.unitPrice > span.unitPriceValue > i";
const COMMUNITY: &str = "div.communityName > a.info";
const LOCATION: &str = "div.areaName > span.info";
const BASE_ITEMS: &str = "div.base > div.content > ul > li";
const TRANSACTION_ITEMS: &str = "div.transaction > div.content > ul > li";
const LABEL: &str = "span.label";
const SPAN: &str = "span";

/// Compiled CSS selectors for every location the extractors read
///
/// Built once per pipeline and shared by all workers.
#[derive(Debug)]
pub struct Selectors {
    pub area_links: Selector,
    pub sub_area_links: Selector,
    pub page_box: Selector,
    pub listing_links: Selector,

    pub title: Selector,
    pub total_price: Selector,
    pub total_price_unit: Selector,
    pub unit_price: Selector,
    pub unit_price_unit: Selector,
    pub community: Selector,
    pub location: Selector,
    pub base_items: Selector,
    pub transaction_items: Selector,
    pub label: Selector,
    pub span: Selector,
}

impl Selectors {
    /// Parses all selectors
    pub fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            area_links: parse(AREA_LINKS)?,
            sub_area_links: parse(SUB_AREA_LINKS)?,
            page_box: parse(PAGE_BOX)?,
            listing_links: parse(LISTING_LINKS)?,
            title: parse(TITLE)?,
            total_price: parse(TOTAL_PRICE)?,
            total_price_unit: parse(TOTAL_PRICE_UNIT)?,
            unit_price: parse(UNIT_PRICE)?,
            unit_price_unit: parse(UNIT_PRICE_UNIT)?,
            community: parse(COMMUNITY)?,
            location: parse(LOCATION)?,
            base_items: parse(BASE_ITEMS)?,
            transaction_items: parse(TRANSACTION_ITEMS)?,
            label: parse(LABEL)?,
            span: parse(SPAN)?,
        })
    }
}

fn parse(css: &str) -> Result<Selector, HarvestError> {
    Selector::parse(css).map_err(|e| HarvestError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}
