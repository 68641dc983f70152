//! Unit tests for ESPN site API payloads

use super::*;
use serde_json::json;

fn houston() -> NflTeam {
    NflTeam {
        id: "34".to_string(),
        abbreviation: "HOU".to_string(),
        display_name: "Houston Texans".to_string(),
    }
}

#[test]
fn test_teams_envelope_uppercases_abbreviations() {
    let payload = json!({
        "sports": [{
            "leagues": [{
                "teams": [
                    {"team": {"id": "34", "abbreviation": "hou", "displayName": "Houston Texans"}},
                    {"team": {"id": 12, "abbreviation": "KC", "displayName": "Kansas City Chiefs"}}
                ]
            }]
        }]
    });

    let teams = serde_json::from_value::<TeamsEnvelope>(payload)
        .unwrap()
        .into_teams();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0], houston());
    // Numeric ids are accepted too
    assert_eq!(teams[1].id, "12");
}

#[test]
fn test_teams_envelope_empty_when_shape_missing() {
    let teams = serde_json::from_value::<TeamsEnvelope>(json!({"sports": []}))
        .unwrap()
        .into_teams();
    assert!(teams.is_empty());
}

#[test]
fn test_roster_keeps_fantasy_positions_and_normalizes_kicker() {
    let payload = json!({
        "athletes": [
            {
                "position": {"name": "Offense"},
                "items": [
                    {
                        "id": "3116385",
                        "firstName": "Joe",
                        "lastName": "Mixon",
                        "displayName": "Joe Mixon",
                        "jersey": "28",
                        "position": {"abbreviation": "RB", "name": "Running Back"},
                        "height": 73.0,
                        "weight": 220.0,
                        "age": 28,
                        "experience": {"years": 8},
                        "college": {"name": "Oklahoma"},
                        "status": {"name": "Active"}
                    },
                    {
                        "id": "1",
                        "displayName": "Some Tackle",
                        "position": {"abbreviation": "OT", "name": "Offensive Tackle"}
                    }
                ]
            },
            {
                "position": "specialTeam",
                "items": [
                    {
                        "id": 2971573,
                        "displayName": "Ka'imi Fairbairn",
                        "position": {"abbreviation": "K", "name": "Place Kicker"},
                        "injured": true
                    }
                ]
            }
        ]
    });

    let players = serde_json::from_value::<RosterEnvelope>(payload)
        .unwrap()
        .into_players(&houston());

    assert_eq!(players.len(), 2);
    let mixon = &players[0];
    assert_eq!(mixon.espn_id, EspnId::new(3116385));
    assert_eq!(mixon.position, "RB");
    assert_eq!(mixon.position_group, "Offense");
    assert_eq!(mixon.height, "73.0");
    assert_eq!(mixon.age, "28");
    assert_eq!(mixon.experience, "8");
    assert_eq!(mixon.college, "Oklahoma");
    assert_eq!(mixon.team_abbreviation, "HOU");
    assert!(mixon.active);

    let kicker = &players[1];
    assert_eq!(kicker.position, "PK");
    assert_eq!(kicker.position_full, "Place Kicker");
    assert_eq!(kicker.position_group, "Unknown");
    assert_eq!(kicker.status, "Active");
    assert!(kicker.injured);
    assert_eq!(kicker.jersey_number, "");
}

#[test]
fn test_athlete_requires_id_name_and_position() {
    let team = houston();
    let no_name: Athlete = serde_json::from_value(json!({
        "id": "5",
        "position": {"abbreviation": "QB"}
    }))
    .unwrap();
    assert!(no_name.to_espn_player(&team, "Offense").is_none());

    let no_position: Athlete = serde_json::from_value(json!({
        "id": "5",
        "displayName": "C.J. Stroud"
    }))
    .unwrap();
    assert!(no_position.to_espn_player(&team, "Offense").is_none());

    let bad_id: Athlete = serde_json::from_value(json!({
        "id": "abc",
        "displayName": "C.J. Stroud",
        "position": {"abbreviation": "QB"}
    }))
    .unwrap();
    assert!(bad_id.to_espn_player(&team, "Offense").is_none());
}
