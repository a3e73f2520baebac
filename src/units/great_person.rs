use rules::constants::{GREAT_ARTIST, GREAT_ENGINEER, GREAT_MERCHANT, GREAT_SCIENTIST};

/// Production a Great Engineer adds to a city's current construction
pub const ENGINEER_PRODUCTION: i32 = 300;
/// Gold a Great Merchant's trade mission brings in
pub const MERCHANT_GOLD: i32 = 350;

/// One-shot effect of expending a great person
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GreatPersonAction {
    FreeTechnology,
    HurryProduction(i32),
    GoldenAge,
    Gold(i32),
}

pub fn great_person_action(unit: &str) -> Option<GreatPersonAction> {
    match unit {
        GREAT_SCIENTIST => Some(GreatPersonAction::FreeTechnology),
        GREAT_ENGINEER => Some(GreatPersonAction::HurryProduction(ENGINEER_PRODUCTION)),
        GREAT_ARTIST => Some(GreatPersonAction::GoldenAge),
        GREAT_MERCHANT => Some(GreatPersonAction::Gold(MERCHANT_GOLD)),
        _ => None,
    }
}
