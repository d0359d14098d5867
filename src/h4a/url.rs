//! Convert the browser URLs stored on a team into federation API endpoints.
//!
//! A browser URL looks like
//! `https://www.handball4all.de/home/portal/pfalz/#/league?ogId=171&lId=789012&tId=123456`.
//! The query sits behind a `#` fragment, so fragment-aware URL parsers drop
//! it. We locate the first `?` literally instead.

use crate::error::{H4aError, Result};
use crate::models::Team;

/// Base of the federation's JSON service.
pub const FEDERATION_API_URL: &str = "https://spo.handball4all.de/service/if_g_json.php";

const PARAM_COMPETITION: &str = "ogId";
const PARAM_LEAGUE: &str = "lId";
const PARAM_TEAM: &str = "tId";
const PARAM_PHASE: &str = "pId";

/// Everything after the first `?`, cut at a trailing `#` fragment if any.
fn query_string<'a>(browser_url: &'a str) -> Result<&'a str> {
    let (_, query) = browser_url
        .split_once('?')
        .ok_or_else(|| H4aError::invalid_url(browser_url, "no query string"))?;
    let query = query.split('#').next().unwrap_or_default();
    if query.is_empty() {
        return Err(H4aError::invalid_url(browser_url, "empty query string"));
    }
    Ok(query)
}

/// Look up `key` in the query; the first non-empty occurrence wins.
fn required_param<'a>(browser_url: &str, query: &'a str, key: &str) -> Result<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, v)| *k == key && !v.is_empty())
        .map(|(_, v)| v)
        .ok_or_else(|| {
            H4aError::invalid_url(browser_url, format!("parameter '{}' is missing", key))
        })
}

/// Query parameters needed to address a team's league standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueQuery {
    pub competition_id: String,
    pub league_id: String,
    pub team_id: String,
}

impl LeagueQuery {
    pub fn from_browser_url(browser_url: &str) -> Result<Self> {
        let query = query_string(browser_url)?;
        Ok(Self {
            competition_id: required_param(browser_url, query, PARAM_COMPETITION)?.to_string(),
            league_id: required_param(browser_url, query, PARAM_LEAGUE)?.to_string(),
            team_id: required_param(browser_url, query, PARAM_TEAM)?.to_string(),
        })
    }

    pub fn api_url(&self, api_base: &str) -> String {
        format!(
            "{}?ca=0&cl={}&cmd=ps&ct={}&og={}",
            api_base, self.league_id, self.team_id, self.competition_id
        )
    }
}

/// Query parameters needed to address a cup phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CupQuery {
    pub competition_id: String,
    pub league_id: String,
    pub phase_id: String,
}

impl CupQuery {
    pub fn from_browser_url(browser_url: &str) -> Result<Self> {
        let query = query_string(browser_url)?;
        Ok(Self {
            competition_id: required_param(browser_url, query, PARAM_COMPETITION)?.to_string(),
            league_id: required_param(browser_url, query, PARAM_LEAGUE)?.to_string(),
            phase_id: required_param(browser_url, query, PARAM_PHASE)?.to_string(),
        })
    }

    pub fn api_url(&self, api_base: &str) -> String {
        format!(
            "{}?ca=1&cl={}&cmd=ps&og={}&p={}",
            api_base, self.league_id, self.competition_id, self.phase_id
        )
    }
}

/// Endpoint builder bound to one API base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(FEDERATION_API_URL)
    }
}

impl Endpoints {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    pub fn league(&self, team: &Team) -> Result<String> {
        let url = team
            .league_url
            .as_deref()
            .ok_or_else(|| H4aError::invalid_url("", "team has no league URL"))?;
        Ok(LeagueQuery::from_browser_url(url)?.api_url(&self.api_base))
    }

    pub fn cup(&self, team: &Team) -> Result<String> {
        let url = team
            .cup_url
            .as_deref()
            .ok_or_else(|| H4aError::invalid_url("", "team has no cup URL"))?;
        Ok(CupQuery::from_browser_url(url)?.api_url(&self.api_base))
    }
}

/// League endpoint for `team` on the public federation API.
pub fn api_url_for_league(team: &Team) -> Result<String> {
    Endpoints::default().league(team)
}

/// Cup endpoint for `team` on the public federation API.
pub fn api_url_for_cup(team: &Team) -> Result<String> {
    Endpoints::default().cup(team)
}
