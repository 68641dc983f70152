use crate::{cli::types::EspnId, storage::EspnPlayer};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[cfg(test)]
mod tests;

/// Roster positions worth importing. `K` is stored as `PK`.
pub const TARGET_POSITIONS: [&str; 6] = ["QB", "RB", "WR", "TE", "PK", "K"];

/// Render a loosely typed JSON scalar the way the roster table stores it.
/// ESPN sends heights and weights as floats and jerseys as strings.
fn de_loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Top-level envelope of `/teams`
#[derive(Debug, Deserialize)]
pub struct TeamsEnvelope {
    #[serde(default)]
    pub sports: Vec<Sport>,
}

#[derive(Debug, Deserialize)]
pub struct Sport {
    #[serde(default)]
    pub leagues: Vec<League>,
}

#[derive(Debug, Deserialize)]
pub struct League {
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TeamEntry {
    pub team: NflTeam,
}

/// An NFL team as listed by ESPN
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NflTeam {
    #[serde(deserialize_with = "de_loose_string")]
    pub id: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

impl TeamsEnvelope {
    /// Teams of the first sport's first league, abbreviations upper-cased.
    pub fn into_teams(self) -> Vec<NflTeam> {
        self.sports
            .into_iter()
            .next()
            .and_then(|sport| sport.leagues.into_iter().next())
            .map(|league| {
                league
                    .teams
                    .into_iter()
                    .map(|entry| NflTeam {
                        abbreviation: entry.team.abbreviation.to_uppercase(),
                        ..entry.team
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Top-level envelope of `/teams/{id}/roster`
#[derive(Debug, Deserialize)]
pub struct RosterEnvelope {
    #[serde(default)]
    pub athletes: Vec<AthleteGroup>,
}

/// Offense, defense or special teams
#[derive(Debug, Deserialize)]
pub struct AthleteGroup {
    #[serde(default)]
    pub position: Value,
    #[serde(default)]
    pub items: Vec<Athlete>,
}

impl AthleteGroup {
    pub fn name(&self) -> &str {
        self.position
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Athlete {
    #[serde(default, deserialize_with = "de_loose_string")]
    pub id: String,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "de_loose_string")]
    pub jersey: String,
    #[serde(default)]
    pub position: Option<AthletePosition>,
    #[serde(default, deserialize_with = "de_loose_string")]
    pub height: String,
    #[serde(default, deserialize_with = "de_loose_string")]
    pub weight: String,
    #[serde(default, deserialize_with = "de_loose_string")]
    pub age: String,
    #[serde(default)]
    pub experience: Option<Experience>,
    #[serde(default)]
    pub college: Option<Named>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub injured: bool,
    #[serde(default)]
    pub status: Option<Named>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct AthletePosition {
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "de_loose_string")]
    pub years: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

impl Athlete {
    /// Convert to an `espn_players` row. `None` for non-fantasy positions
    /// and for athletes missing an id, display name or position.
    pub fn to_espn_player(&self, team: &NflTeam, group_name: &str) -> Option<EspnPlayer> {
        let position = self.position.as_ref()?;
        if !TARGET_POSITIONS.contains(&position.abbreviation.as_str()) {
            return None;
        }
        let abbreviation = match position.abbreviation.as_str() {
            "K" => "PK".to_string(),
            other => other.to_string(),
        };

        if self.display_name.is_empty() {
            return None;
        }
        let espn_id: EspnId = self.id.trim().parse().ok()?;

        Some(EspnPlayer {
            espn_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            display_name: self.display_name.clone(),
            position: abbreviation,
            position_full: position.name.clone(),
            position_group: group_name.to_string(),
            jersey_number: self.jersey.clone(),
            team_id: team.id.clone(),
            team_name: team.display_name.clone(),
            team_abbreviation: team.abbreviation.clone(),
            height: self.height.clone(),
            weight: self.weight.clone(),
            age: self.age.clone(),
            experience: self
                .experience
                .as_ref()
                .map(|e| e.years.clone())
                .unwrap_or_default(),
            college: self
                .college
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            active: self.active,
            injured: self.injured,
            status: self
                .status
                .as_ref()
                .map(|s| s.name.clone())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Active".to_string()),
        })
    }
}

impl RosterEnvelope {
    /// Fantasy-relevant players across every position group.
    pub fn into_players(self, team: &NflTeam) -> Vec<EspnPlayer> {
        self.athletes
            .iter()
            .flat_map(|group| {
                let name = group.name();
                group
                    .items
                    .iter()
                    .filter_map(move |athlete| athlete.to_espn_player(team, name))
            })
            .collect()
    }
}
