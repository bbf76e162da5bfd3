//! HTTP API response DTOs.

use serde::Serialize;

/// Entry of `GET /api/channels`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelDto {
    pub id: Option<i64>,
    pub name: String,
    pub created: String,
}

/// Body of `GET /api/me`. There is no authentication layer, so it is always empty.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MeDto {}
