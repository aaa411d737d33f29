//! Follow requests and follow management from profile pages.

use quire_common::ids::last_segment;
use quire_common::{FollowPair, QuireError};
use web_sys::HtmlButtonElement;

use crate::dom::{self, DomError};
use crate::page::page_client;

/// Ask to follow `to_id` as `from_id`.
///
/// Both authors are fetched first so the request carries their full
/// profiles. On success the button turns into a disabled "Pending".
pub async fn send_follow_request(
    button: &HtmlButtonElement,
    from_id: &str,
    to_id: &str,
) -> Result<(), DomError> {
    let client = page_client(&dom::document()?)?;
    let authors = async {
        let actor = client.fetch_author(last_segment(from_id)).await?;
        let object = client.fetch_author(last_segment(to_id)).await?;
        Ok::<_, QuireError>((actor, object))
    }
    .await;
    let (actor, object) = match authors {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(error = %e, "author fetch failed");
            return dom::alert("Failed to fetch author info.");
        }
    };

    match client.send_follow_request(actor, object).await {
        Ok(()) => {
            button.set_text_content(Some("Pending"));
            button.set_disabled(true);
            let _ = button.class_list().remove_1("follow");
            Ok(())
        }
        Err(e) => dom::alert(&e.user_message("Failed to send follow request.")),
    }
}

/// Accept a pending request from `from_id` to the signed-in author.
pub async fn accept_follow(from_id: &str, current_user: &str) -> Result<bool, DomError> {
    let pair = FollowPair {
        from_author: from_id.to_string(),
        to_author: current_user.to_string(),
    };
    manage(&pair, true, "Failed to accept request.").await
}

/// Remove the follow `from_id` → `to_id`. Covers unfollowing, declining a
/// request and making someone stop following you.
pub async fn remove_follow(from_id: &str, to_id: &str) -> Result<bool, DomError> {
    let pair = FollowPair {
        from_author: from_id.to_string(),
        to_author: to_id.to_string(),
    };
    manage(&pair, false, "Unfollow failed.").await
}

/// Drop the follow in both directions.
pub async fn unfriend(a: &str, b: &str) -> Result<bool, DomError> {
    let first = remove_follow(a, b).await?;
    let second = remove_follow(b, a).await?;
    Ok(first && second)
}

/// Returns whether the server accepted the change, alerting otherwise.
async fn manage(pair: &FollowPair, accept: bool, failure: &str) -> Result<bool, DomError> {
    let client = page_client(&dom::document()?)?;
    let result = if accept {
        client.accept_follow(pair).await
    } else {
        client.remove_follow(pair).await
    };
    match result {
        Ok(()) => {
            tracing::info!(from = %pair.from_author, to = %pair.to_author, accept, "follow updated");
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(error = %e, "follow update rejected");
            dom::alert(failure)?;
            Ok(false)
        }
    }
}
