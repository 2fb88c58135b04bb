/// Number of columns in every output row, header included
pub const COLUMN_COUNT: usize = 31;

/// Column names, in the same order as `House::to_row`
pub const HEADER: [&str; COLUMN_COUNT] = [
    "编号",
    "页面标题",
    "页面链接",
    "房屋总价",
    "总价单位",
    "房屋单价",
    "单价单位",
    "小区名称",
    "小区位置",
    "细分区域",
    "环路范围",
    "房屋类型",
    "所在楼层",
    "建筑面积",
    "户型结构",
    "套内面积",
    "建筑类型",
    "房屋朝向",
    "建筑结构",
    "装修情况",
    "配备电梯",
    "梯户比例",
    "供暖方式",
    "挂牌时间",
    "交易权属",
    "上次交易",
    "房屋用途",
    "房屋年限",
    "产权所属",
    "抵押信息",
    "房本备件",
];

/// One listing detail page, fully populated in a single extraction pass
///
/// Numeric fields default to zero and text fields to the empty string when
/// the page does not provide them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct House {
    /// Sequential identifier, assigned by the sink when the row is written
    pub id: u64,
    pub title: String,
    pub url: String,
    pub total_price: f64,
    pub total_price_unit: String,
    pub unit_price: f64,
    pub unit_price_unit: String,
    pub community: String,

    // Location decomposition
    pub area: String,
    pub sub_area: String,
    pub ring_road: String,

    // Base info block
    pub house_type: String,
    pub floor: String,
    /// Gross floor area in square meters
    pub gross_area: f64,
    pub structure: String,
    /// Net (interior) area in square meters
    pub net_area: f64,
    pub building_type: String,
    pub orientation: String,
    pub building_structure: String,
    pub decoration: String,
    pub elevator: String,
    pub elevator_ratio: String,
    pub heating_mode: String,

    // Transaction info block
    pub listing_time: String,
    pub transaction: String,
    pub last_transaction_time: String,
    pub usage: String,
    pub year: String,
    pub property: String,
    pub mortgage: String,
    pub property_cert: String,
}

impl House {
    /// Serializes the record into its CSV columns
    ///
    /// Text is written verbatim, the id as a decimal integer, prices and
    /// areas with exactly two fraction digits.
    pub fn to_row(&self) -> [String; COLUMN_COUNT] {
        [
            self.id.to_string(),
            self.title.clone(),
            self.url.clone(),
            format_decimal(self.total_price),
            self.total_price_unit.clone(),
            format_decimal(self.unit_price),
            self.unit_price_unit.clone(),
            self.community.clone(),
            self.area.clone(),
            self.sub_area.clone(),
            self.ring_road.clone(),
            self.house_type.clone(),
            self.floor.clone(),
            format_decimal(self.gross_area),
            self.structure.clone(),
            format_decimal(self.net_area),
            self.building_type.clone(),
            self.orientation.clone(),
            self.building_structure.clone(),
            self.decoration.clone(),
            self.elevator.clone(),
            self.elevator_ratio.clone(),
            self.heating_mode.clone(),
            self.listing_time.clone(),
            self.transaction.clone(),
            self.last_transaction_time.clone(),
            self.usage.clone(),
            self.year.clone(),
            self.property.clone(),
            self.mortgage.clone(),
            self.property_cert.clone(),
        ]
    }
}

fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}
