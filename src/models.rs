// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Data models for workspace pages and users

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One workspace page, normalized for the analytics engine.
///
/// Timestamps stay as the API's RFC 3339 strings; the engine parses them so
/// a malformed timestamp degrades to a per-record skip instead of a load
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Opaque page identifier, unique across the snapshot
    pub id: String,

    /// Creation timestamp (RFC 3339)
    pub created_time: String,

    /// Id of the creating user; may not resolve in the directory
    pub created_by: String,

    /// Last-edit timestamp (RFC 3339), >= created_time
    pub last_edited_time: String,

    /// Id of the last editor; may not resolve in the directory
    pub last_edited_by: String,

    /// Whether the page is archived
    #[serde(default)]
    pub archived: bool,

    /// Page title, when known (usually supplied by the export scan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Canonical page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One workspace user from the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User id
    pub id: String,

    /// Display name
    pub name: String,

    /// Email, when the API exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Account type ("person" or "bot"), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

/// User id -> user info. Ids referenced by pages but absent here are
/// deleted users; the engine tracks them as a distinct pseudo-segment.
///
/// `BTreeMap` keeps iteration order deterministic across runs.
pub type UserDirectory = BTreeMap<String, UserInfo>;

// ============================================================================
// Raw API Shapes
// ============================================================================

/// A user reference as the API serializes it: either a bare id string or a
/// `{"object": "user", "id": "..."}` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Object { id: String },
}

impl UserRef {
    pub fn into_id(self) -> String {
        match self {
            UserRef::Id(id) => id,
            UserRef::Object { id } => id,
        }
    }
}

/// Page object as returned by the search and retrieve endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub id: String,
    pub created_time: String,
    pub created_by: UserRef,
    pub last_edited_time: String,
    pub last_edited_by: UserRef,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<RawPage> for PageRecord {
    fn from(raw: RawPage) -> Self {
        PageRecord {
            id: raw.id,
            created_time: raw.created_time,
            created_by: raw.created_by.into_id(),
            last_edited_time: raw.last_edited_time,
            last_edited_by: raw.last_edited_by.into_id(),
            archived: raw.archived,
            title: None,
            url: raw.url,
        }
    }
}

/// User object as returned by the users endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub person: Option<RawPerson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPerson {
    #[serde(default)]
    pub email: Option<String>,
}

impl From<RawUser> for UserInfo {
    fn from(raw: RawUser) -> Self {
        UserInfo {
            name: raw.name.unwrap_or_else(|| "Unknown".to_string()),
            email: raw.person.and_then(|p| p.email),
            account_type: raw.account_type,
            id: raw.id,
        }
    }
}
