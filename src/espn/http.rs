use std::time::Duration;

use reqwest::Client;

use super::types::{NflTeam, RosterEnvelope, TeamsEnvelope};
use crate::{error::LeagueError, storage::EspnPlayer, Result};


/// Base path for the public ESPN NFL site API.
pub const ESPN_SITE_BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports/football/nfl";

/// Pause between roster requests.
pub const ROSTER_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Build the client used for ESPN requests.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder().timeout(Duration::from_secs(10)).build()?)
}

/// Fetch every NFL team.
pub async fn fetch_nfl_teams(client: &Client) -> Result<Vec<NflTeam>> {
    fetch_nfl_teams_with_base_url(client, ESPN_SITE_BASE_URL).await
}

/// Fetch every NFL team from `base_url` (overridable for tests).
///
/// An empty team list is an error, since nothing could be imported.
pub async fn fetch_nfl_teams_with_base_url(client: &Client, base_url: &str) -> Result<Vec<NflTeam>> {
    let url = format!("{}/teams", base_url);
    let envelope = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<TeamsEnvelope>()
        .await?;

    let teams = envelope.into_teams();
    if teams.is_empty() {
        return Err(LeagueError::NoData);
    }
    Ok(teams)
}

/// Fetch one team's fantasy-relevant players.
pub async fn fetch_team_roster(client: &Client, team: &NflTeam) -> Result<Vec<EspnPlayer>> {
    fetch_team_roster_with_base_url(client, ESPN_SITE_BASE_URL, team).await
}

/// Fetch one team's fantasy-relevant players from `base_url`.
pub async fn fetch_team_roster_with_base_url(
    client: &Client,
    base_url: &str,
    team: &NflTeam,
) -> Result<Vec<EspnPlayer>> {
    let url = format!("{}/teams/{}/roster", base_url, team.id);
    let envelope = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<RosterEnvelope>()
        .await?;

    Ok(envelope.into_players(team))
}
