//! Common regex patterns for contract field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Normalization
    pub static ref SPACE_RUN: Regex = Regex::new(r"[ \t]+").unwrap();

    pub static ref ZERO_WIDTH: Regex = Regex::new(
        r"[\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}]"
    ).unwrap();

    // Dates. The leading group keeps a longer digit run from matching mid-number;
    // a digit right after the day is rejected by the date extractor.
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"(?:^|[^0-9])([0-9]{4})[./\-]([0-9]{1,2})[./\-]([0-9]{1,2})"
    ).unwrap();

    pub static ref DATE_REPUBLIC: Regex = Regex::new(
        r"(?:^|[^0-9])([0-9]{3,4})[./\-]([0-9]{1,2})[./\-]([0-9]{1,2})"
    ).unwrap();

    pub static ref DATE_CHINESE: Regex = Regex::new(
        r"(?:^|[^0-9])([0-9]{2,4})\s*年\s*([0-9]{1,2})\s*月\s*([0-9]{1,2})\s*[日號]"
    ).unwrap();

    // Amounts
    pub static ref MONEY: Regex = Regex::new(
        r"([0-9]+(?:\.[0-9]+)?)\s*(元|NT|新台幣)?"
    ).unwrap();

    pub static ref PERCENTAGE: Regex = Regex::new(
        r"([0-9]{1,3}(?:\.[0-9]+)?)\s*[%％]"
    ).unwrap();

    // Package price table, e.g. 自選餐(全選)(2,520元)、家庭特選餐(3,792元)
    pub static ref PACKAGE_PRICE: Regex = Regex::new(
        r"([^，,()（）\n]+?餐)[\s(（]*[^0-9]*([0-9]{1,3}(?:,?[0-9]{3})*)\s*元"
    ).unwrap();

    // Daily subsidy per bandwidth tier
    pub static ref DAILY_TIER_AMOUNT: Regex = Regex::new(
        r"(100M/40M|300M/300M|500M/500M|1G/1G|2G/1G|2G/2G)[\s,，:：]*([0-9.]+)\s*元"
    ).unwrap();

    pub static ref DAILY_WIFI_AMOUNT: Regex = Regex::new(
        r"Wi[- ]?Fi.*?[:：]?\s*([0-9.]+)\s*元"
    ).unwrap();

    // Contract duration
    pub static ref CONTRACT_TWO_YEARS: Regex = Regex::new(r"2年|24個月").unwrap();

    // MOD flat penalties, e.g. 未租滿12個月者，解約金398元
    pub static ref MOD_UNDER_12_MONTHS: Regex = Regex::new(
        r"未租滿\s*12\s*個?月.*?解約金\s*[:：]?\s*([0-9,]+)\s*元"
    ).unwrap();

    pub static ref MOD_UNDER_24_MONTHS: Regex = Regex::new(
        r"未租滿\s*24\s*個?月.*?解約金\s*[:：]?\s*([0-9,]+)\s*元"
    ).unwrap();
}
