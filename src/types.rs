use std::collections::HashMap;

use serde::Deserialize;

/// Canonical resource order (alphabetical). Shared by the price table, the
/// resource grid and resource-modal navigation, regardless of the order the
/// server returns quotes in.
pub const RESOURCE_CATALOG: [&str; 9] = [
    "дерево", "железо", "зерно", "золото", "камень", "овощи", "рабы", "рыба", "скот",
];

/// Canonical building order: three fixed grid rows of 4, 4 and 3.
pub const BUILDING_CATALOG: [&str; 11] = [
    "Лесоповал",
    "Каменоломня",
    "Теплицы",
    "Трактир",
    "Посевные поля",
    "Рыболовня",
    "Кузнечная",
    "Ферма",
    "Постоялый двор",
    "Куртизанские палатки",
    "Золотой рудник",
];

pub const BUILDING_GRID_ROWS: [usize; 3] = [4, 4, 3];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceQuote {
    pub resource: String,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub change_from_prev_percent: f64,
    #[serde(default)]
    pub change_from_start_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub growth_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildingAggregate {
    pub name: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub players_percentage: f64,
}

impl BuildingAggregate {
    /// Placeholder card for a catalog entry the server did not report.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: 0,
            players_percentage: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingStatus {
    Building,
    Completed,
    Active,
    ForSale,
}

impl BuildingStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Building => "Строится",
            Self::Completed => "Построен",
            Self::Active => "Активен",
            Self::ForSale => "На продаже",
        }
    }

    /// Only finished buildings that are not already listed can be sold.
    pub fn sellable(self) -> bool {
        matches!(self, Self::Active | Self::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerBuilding {
    pub id: String,
    pub name: String,
    pub status: BuildingStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerState {
    /// Absent nickname signals "needs onboarding".
    pub nickname: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub money: f64,
    #[serde(default)]
    pub resources: HashMap<String, i64>,
    #[serde(default)]
    pub buildings: Vec<PlayerBuilding>,
}

impl PlayerState {
    pub fn resource_amount(&self, resource: &str) -> i64 {
        self.resources.get(resource).copied().unwrap_or(0)
    }

    /// First building of the given type eligible for a sell-building action.
    pub fn sellable_building(&self, name: &str) -> Option<&PlayerBuilding> {
        self.buildings
            .iter()
            .find(|b| b.name == name && b.status.sellable())
    }

    pub fn buildings_of(&self, name: &str) -> Vec<&PlayerBuilding> {
        self.buildings.iter().filter(|b| b.name == name).collect()
    }
}

/// Last-known server state tracked by the client.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    pub round: u32,
    pub num_players: u32,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub prices: Vec<PriceQuote>,
    pub buildings: Vec<BuildingAggregate>,
}

/// A partial snapshot update from either channel. Fields left `None` keep
/// their previously cached values.
#[derive(Debug, Clone, Default)]
pub struct SnapshotUpdate {
    pub round: Option<u32>,
    pub num_players: Option<u32>,
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
    pub prices: Option<Vec<PriceQuote>>,
    pub buildings: Option<Vec<BuildingAggregate>>,
    pub player: Option<PlayerState>,
}

impl SnapshotUpdate {
    pub fn player(player: PlayerState) -> Self {
        Self {
            player: Some(player),
            ..Default::default()
        }
    }

    pub fn prices(prices: Vec<PriceQuote>) -> Self {
        Self {
            prices: Some(prices),
            ..Default::default()
        }
    }

    pub fn round(round: u32) -> Self {
        Self {
            round: Some(round),
            ..Default::default()
        }
    }
}

/// One message on the push channel. Collections arrive wrapped one level deep
/// (`{"prices": {"prices": [...]}}` and so on).
#[derive(Debug, Deserialize)]
pub struct PushFrame {
    pub current_round: Option<u32>,
    pub num_players: Option<u32>,
    pub leaderboard: Option<LeaderboardEnvelope>,
    pub prices: Option<PricesEnvelope>,
    pub buildings: Option<BuildingsEnvelope>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardEnvelope {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PricesEnvelope {
    #[serde(default)]
    pub prices: Vec<PriceQuote>,
}

#[derive(Debug, Deserialize)]
pub struct BuildingsEnvelope {
    #[serde(default)]
    pub buildings: Vec<BuildingAggregate>,
}

impl From<PushFrame> for SnapshotUpdate {
    fn from(frame: PushFrame) -> Self {
        Self {
            round: frame.current_round,
            num_players: frame.num_players,
            leaderboard: frame.leaderboard.map(|e| e.leaderboard),
            prices: frame.prices.map(|e| e.prices),
            buildings: frame.buildings.map(|e| e.buildings),
            player: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildingOwner {
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

/// `GET /api/building/{name}`. The modal keeps showing the grid-cached
/// count/percentage; only the owners list comes from here.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingDetails {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub players_percentage: f64,
    #[serde(default)]
    pub owners: Vec<BuildingOwner>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PricePoint {
    pub round: u32,
    pub price: f64,
}

/// `GET /api/resource/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDetails {
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub change_from_prev_percent: f64,
    #[serde(default)]
    pub change_from_start_percent: f64,
    #[serde(default)]
    pub demand_level: String,
    #[serde(default)]
    pub supply_level: String,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
    pub error: Option<String>,
}

/// One entry of `GET /api/miniapp/buildings` — a construction offer.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingOffer {
    pub name: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub cost_details: String,
    #[serde(default)]
    pub can_build: bool,
}

/// Shared response shape of every mutating endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}
