//! Permission rules for tenders and bids.
//!
//! The functions here take facts already loaded from the store (a user's
//! organization memberships, a bid's author) and answer yes or no. Missing
//! entities are reported by the loader as `NotFound` before these rules run,
//! so `false` here always means "exists, but not yours".

use crate::author::BidAuthor;
use crate::error::CoreError;
use crate::types::DbId;

/// A user may act on a tender iff they are responsible for its organization.
pub fn tender_allows(tender_organization: DbId, user_organizations: &[DbId]) -> bool {
    user_organizations.contains(&tender_organization)
}

/// A user may act on a bid iff they wrote it, or they are responsible for
/// the organization that wrote it.
pub fn bid_author_allows(author: &BidAuthor, user_id: DbId, user_organizations: &[DbId]) -> bool {
    match author {
        BidAuthor::User(author_id) => *author_id == user_id,
        BidAuthor::Organization(org_id) => user_organizations.contains(org_id),
    }
}

/// Turn a negative permission answer into [`CoreError::Forbidden`].
pub fn ensure_allowed(allowed: bool, action: &str) -> Result<(), CoreError> {
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("No permission to {action}")))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn tender_member_is_allowed() {
        let org = DbId::new_v4();
        assert!(tender_allows(org, &[org]));
    }

    #[test]
    fn tender_outsider_is_denied() {
        let org = DbId::new_v4();
        assert!(!tender_allows(org, &[DbId::new_v4()]));
        assert!(!tender_allows(org, &[]));
    }

    #[test]
    fn individual_bid_allows_only_its_author() {
        let author = DbId::new_v4();
        let bid = BidAuthor::User(author);
        assert!(bid_author_allows(&bid, author, &[]));
        assert!(!bid_author_allows(&bid, DbId::new_v4(), &[]));
    }

    #[test]
    fn individual_bid_ignores_memberships() {
        let author = DbId::new_v4();
        let org = DbId::new_v4();
        // Sharing an organization with the author does not grant access.
        assert!(!bid_author_allows(&BidAuthor::User(author), DbId::new_v4(), &[org]));
    }

    #[test]
    fn organization_bid_allows_any_member() {
        let org = DbId::new_v4();
        let bid = BidAuthor::Organization(org);
        assert!(bid_author_allows(&bid, DbId::new_v4(), &[org]));
        assert!(bid_author_allows(&bid, DbId::new_v4(), &[DbId::new_v4(), org]));
    }

    #[test]
    fn organization_bid_denies_other_organizations() {
        let bid = BidAuthor::Organization(DbId::new_v4());
        assert!(!bid_author_allows(&bid, DbId::new_v4(), &[DbId::new_v4()]));
    }

    #[test]
    fn organization_bid_is_not_matched_by_user_id() {
        let org = DbId::new_v4();
        assert!(!bid_author_allows(&BidAuthor::Organization(org), org, &[]));
    }

    #[test]
    fn ensure_allowed_maps_to_forbidden() {
        assert!(ensure_allowed(true, "edit tender").is_ok());
        assert_matches!(
            ensure_allowed(false, "edit tender"),
            Err(CoreError::Forbidden(msg)) if msg == "No permission to edit tender"
        );
    }
}
