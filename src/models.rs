//! Stat-category tables mapping tool arguments onto stats.nba.com columns,
//! result sets and sort codes.

/// Column in the `leaguehustlestatsplayer` row set.
pub struct HustleStat {
    pub key: &'static str,
    pub column: usize,
    pub label: &'static str,
}

pub const HUSTLE_STATS: &[HustleStat] = &[
    HustleStat { key: "deflections", column: 10, label: "Deflections" },
    HustleStat { key: "charges", column: 11, label: "Charges Drawn" },
    HustleStat { key: "screen_assists", column: 12, label: "Screen Assists" },
    HustleStat { key: "loose_balls", column: 16, label: "Loose Balls Recovered" },
    HustleStat { key: "box_outs", column: 23, label: "Box Outs" },
];

pub fn hustle_stat(key: &str) -> Option<&'static HustleStat> {
    HUSTLE_STATS.iter().find(|s| s.key == key)
}

/// Named result set in the `alltimeleadersgrids` response.
pub struct AllTimeStat {
    pub key: &'static str,
    pub result_set: &'static str,
}

impl AllTimeStat {
    pub fn is_percentage(&self) -> bool {
        self.key.contains("pct")
    }

    /// `"three_point_pct"` → `"Three Point Pct"`
    pub fn title(&self) -> String {
        self.key
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub const ALL_TIME_STATS: &[AllTimeStat] = &[
    AllTimeStat { key: "points", result_set: "PTSLeaders" },
    AllTimeStat { key: "rebounds", result_set: "REBLeaders" },
    AllTimeStat { key: "assists", result_set: "ASTLeaders" },
    AllTimeStat { key: "steals", result_set: "STLLeaders" },
    AllTimeStat { key: "blocks", result_set: "BLKLeaders" },
    AllTimeStat { key: "games", result_set: "GPLeaders" },
    AllTimeStat { key: "offensive_rebounds", result_set: "OREBLeaders" },
    AllTimeStat { key: "defensive_rebounds", result_set: "DREBLeaders" },
    AllTimeStat { key: "field_goals_made", result_set: "FGMLeaders" },
    AllTimeStat { key: "field_goals_attempted", result_set: "FGALeaders" },
    AllTimeStat { key: "field_goal_pct", result_set: "FG_PCTLeaders" },
    AllTimeStat { key: "three_pointers_made", result_set: "FG3MLeaders" },
    AllTimeStat { key: "three_pointers_attempted", result_set: "FG3ALeaders" },
    AllTimeStat { key: "three_point_pct", result_set: "FG3_PCTLeaders" },
    AllTimeStat { key: "free_throws_made", result_set: "FTMLeaders" },
    AllTimeStat { key: "free_throws_attempted", result_set: "FTALeaders" },
    AllTimeStat { key: "free_throw_pct", result_set: "FT_PCTLeaders" },
    AllTimeStat { key: "turnovers", result_set: "TOVLeaders" },
    AllTimeStat { key: "personal_fouls", result_set: "PFLeaders" },
];

pub fn all_time_stat(key: &str) -> Option<&'static AllTimeStat> {
    ALL_TIME_STATS.iter().find(|s| s.key == key)
}

/// Sorted list of category keys, for error messages.
pub fn all_time_keys() -> String {
    let mut keys: Vec<&str> = ALL_TIME_STATS.iter().map(|s| s.key).collect();
    keys.sort_unstable();
    keys.join(", ")
}

/// Display label → `leaguegamelog` column code. Unknown labels sort by points.
pub const LEADER_STATS: &[(&str, &str)] = &[
    ("Points", "PTS"),
    ("Assists", "AST"),
    ("Rebounds", "REB"),
    ("Steals", "STL"),
    ("Blocks", "BLK"),
    ("FG%", "FG_PCT"),
    ("3P%", "FG3_PCT"),
    ("FT%", "FT_PCT"),
];

pub fn leader_code(label: &str) -> &'static str {
    LEADER_STATS
        .iter()
        .find(|(l, _)| *l == label)
        .map_or("PTS", |(_, code)| *code)
}

pub fn is_percentage_code(code: &str) -> bool {
    matches!(code, "FG_PCT" | "FG3_PCT" | "FT_PCT")
}
