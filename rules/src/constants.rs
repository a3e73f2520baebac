//! Names the simulation refers to directly.

pub const WORKER: &str = "Worker";
pub const SETTLER: &str = "Settler";
pub const PALACE: &str = "Palace";

/// Perpetual production options
pub const GOLD_CONSTRUCTION: &str = "Gold";
pub const SCIENCE_CONSTRUCTION: &str = "Science";

pub const GREAT_SCIENTIST: &str = "Great Scientist";
pub const GREAT_ENGINEER: &str = "Great Engineer";
pub const GREAT_ARTIST: &str = "Great Artist";
pub const GREAT_MERCHANT: &str = "Great Merchant";

pub const HILL: &str = "Hill";
pub const MOUNTAIN: &str = "Mountain";
pub const DESERT: &str = "Desert";
pub const COAST: &str = "Coast";
pub const FOREST: &str = "Forest";
pub const JUNGLE: &str = "Jungle";
pub const MARSH: &str = "Marsh";
pub const GRASSLAND: &str = "Grassland";
pub const PLAINS: &str = "Plains";
pub const TUNDRA: &str = "Tundra";

pub const ROAD: &str = "Road";
pub const RAILROAD: &str = "Railroad";
pub const REMOVE_PREFIX: &str = "Remove ";
pub const FARM: &str = "Farm";
pub const MINE: &str = "Mine";
pub const LUMBER_MILL: &str = "Lumber mill";
pub const TRADING_POST: &str = "Trading post";

/// Technologies with hard-wired effects
pub mod techs {
    pub const MACHINERY: &str = "Machinery";
    pub const RAILROAD: &str = "Railroad";
    pub const COMBUSTION: &str = "Combustion";
    pub const COMPUTERS: &str = "Computers";
}

pub const TEMPLE: &str = "Temple";

/// Cheapest-first candidates for a free culture building
pub const CULTURE_BUILDINGS: [&str; 4] = ["Monument", "Temple", "Opera House", "Museum"];

/// Buildings that gain happiness from Humanism
pub const SCHOLARLY_BUILDINGS: [&str; 3] = ["University", "Observatory", "Public School"];

/// Resources with hard-wired effects
pub const MARBLE: &str = "Marble";

/// Unique strings carried by buildings and units
pub mod uniques {
    pub const INDICATES_CAPITAL: &str = "Indicates the capital city";
    pub const MUST_BE_NEXT_TO_DESERT: &str = "Must be next to desert";
    pub const MUST_BE_NEXT_TO_MOUNTAIN: &str = "Must be next to mountain";
    pub const COASTAL_ONLY: &str = "Can only be built in coastal cities";
    pub const SCIENCE_PER_2_POP: &str = "+1 Science per 2 population";
    pub const TRADE_ROUTE_GOLD_INCREASE: &str = "Gold from trade routes +25%";
    pub const SCIENCE_CONVERSION_INCREASE: &str = "Production to science conversion increased by 33%";
    pub const GOLDEN_AGE_LENGTH_INCREASE: &str = "Golden Age length increases +50%";
    pub const CITIZEN_UNHAPPINESS_DECREASED: &str = "Unhappiness from population decreased by 10%";
    pub const POLICY_COST_REDUCTION: &str = "Culture cost of adopting new policies reduced by 10%";
    pub const NEW_TILE_COST_REDUCTION: &str = "Culture and gold costs of acquiring new tiles reduced by 25% in this city";
    pub const GREAT_PERSON_GENERATION_INCREASE: &str = "Great person generation increased by 33%";
    pub const ENTER_GOLDEN_AGE: &str = "Empire enters golden age";
    pub const FREE_GREAT_SCIENTIST: &str = "Free great scientist appears";
    pub const FREE_GREAT_ARTIST: &str = "Free Great Artist appears";
    pub const TWO_FREE_WORKERS: &str = "Provides 2 free workers";
    pub const FREE_SOCIAL_POLICY: &str = "Free Social Policy";
    pub const HAPPINESS_PER_SOCIAL_POLICY: &str = "+1 Happiness per adopted policy";

    pub const CAN_BUILD_IMPROVEMENTS: &str = "Can build improvements on tiles";
    pub const FOUNDS_CITY: &str = "Founds a new city";
    pub const GREAT_PERSON: &str = "Great Person";
}

/// Policy names with hard-wired effects
pub mod policies {
    pub const TRADITION: &str = "Tradition";
    pub const ARISTOCRACY: &str = "Aristocracy";
    pub const LEGALISM: &str = "Legalism";
    pub const LANDED_ELITE: &str = "Landed Elite";
    pub const MONARCHY: &str = "Monarchy";
    pub const TRADITION_COMPLETE: &str = "Tradition Complete";
    pub const LIBERTY: &str = "Liberty";
    pub const COLLECTIVE_RULE: &str = "Collective Rule";
    pub const CITIZENSHIP: &str = "Citizenship";
    pub const REPUBLIC: &str = "Republic";
    pub const REPRESENTATION: &str = "Representation";
    pub const MERITOCRACY: &str = "Meritocracy";
    pub const LIBERTY_COMPLETE: &str = "Liberty Complete";
    pub const PIETY: &str = "Piety";
    pub const MANDATE_OF_HEAVEN: &str = "Mandate Of Heaven";
    pub const REFORMATION: &str = "Reformation";
    pub const FREE_RELIGION: &str = "Free Religion";
    pub const PIETY_COMPLETE: &str = "Piety Complete";
    pub const ORGANIZED_RELIGION: &str = "Organized Religion";
    pub const THEOCRACY: &str = "Theocracy";
    pub const COMMERCE: &str = "Commerce";
    pub const TRADE_UNIONS: &str = "Trade Unions";
    pub const MERCANTILISM: &str = "Mercantilism";
    pub const PROTECTIONISM: &str = "Protectionism";
    pub const ENTREPRENEURSHIP: &str = "Entrepreneurship";
    pub const COMMERCE_COMPLETE: &str = "Commerce Complete";
    pub const RATIONALISM: &str = "Rationalism";
    pub const SECULARISM: &str = "Secularism";
    pub const HUMANISM: &str = "Humanism";
    pub const SOVEREIGNTY: &str = "Sovereignty";
    pub const FREE_THOUGHT: &str = "Free Thought";
    pub const SCIENTIFIC_REVOLUTION: &str = "Scientific Revolution";
    pub const FREEDOM: &str = "Freedom";
    pub const CONSTITUTION: &str = "Constitution";
    pub const CIVIL_SOCIETY: &str = "Civil Society";
    pub const DEMOCRACY: &str = "Democracy";
    pub const FREE_SPEECH: &str = "Free Speech";
    pub const UNIVERSAL_SUFFRAGE: &str = "Universal Suffrage";
    pub const FREEDOM_COMPLETE: &str = "Freedom Complete";
}
