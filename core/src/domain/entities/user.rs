//! User record entity cached by the session.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a user in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A candidate offering their profile to vendors
    Candidate,
    /// A vendor browsing and hiring candidates
    Vendor,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Candidate => write!(f, "candidate"),
            UserRole::Vendor => write!(f, "vendor"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candidate" => Ok(UserRole::Candidate),
            "vendor" => Ok(UserRole::Vendor),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Subscription plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Free tier, the starting point for every new account
    Free,
    /// Paid standard tier
    Standard,
    /// Paid premium tier
    Premium,
}

impl Default for Plan {
    fn default() -> Self {
        Plan::Free
    }
}

/// Structured entitlement describing which categories and subcategories
/// of the marketplace a candidate is permitted to appear in.
///
/// `None` on the user record means no grant at all; an empty map is
/// treated the same way by `UserRecord::has_visibility`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityGrant {
    /// Category name mapped to the granted subcategories
    pub categories: BTreeMap<String, Vec<String>>,
}

impl VisibilityGrant {
    /// Grant with no categories
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the grant carries any category at all
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Whether a category/subcategory pair is covered by this grant
    pub fn covers(&self, category: &str, subcategory: &str) -> bool {
        self.categories
            .get(category)
            .map(|subs| subs.iter().any(|s| s == subcategory))
            .unwrap_or(false)
    }
}

/// Cached profile of the authenticated user
///
/// Owned exclusively by the session: replaced wholesale on login,
/// registration, or refresh-from-server. The only in-place mutation is
/// `set_plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Account email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Marketplace role
    pub role: UserRole,

    /// Current subscription plan
    #[serde(default)]
    pub plan: Plan,

    /// Visibility entitlement; `None` iff the user has no grant
    #[serde(default)]
    pub visibility: Option<VisibilityGrant>,

    /// Whether the user has ever completed a visibility purchase
    #[serde(default)]
    pub has_purchased_visibility: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a new record on the free tier with no visibility grant
    pub fn new(email: String, first_name: String, last_name: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            role,
            plan: Plan::Free,
            visibility: None,
            has_purchased_visibility: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name shown in the shell chrome
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Checks if the user is a candidate
    pub fn is_candidate(&self) -> bool {
        self.role == UserRole::Candidate
    }

    /// Checks if the user is a vendor
    pub fn is_vendor(&self) -> bool {
        self.role == UserRole::Vendor
    }

    /// Checks if the user is on the free tier
    pub fn is_free_plan(&self) -> bool {
        self.plan == Plan::Free
    }

    /// Checks if the user holds a non-empty visibility grant
    pub fn has_visibility(&self) -> bool {
        self.visibility.as_ref().map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// The single permitted in-place mutation: update the plan field
    pub fn set_plan(&mut self, plan: Plan) {
        self.plan = plan;
        self.updated_at = Utc::now();
    }
}
