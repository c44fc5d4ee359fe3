use crate::config::TicketMatcher;
use crate::data::LinkAction;

/// Turn the first bracketed ticket that ends a line into a Markdown link.
///
/// The matched token and its line break are replaced by `[ID](<base-url>ID)`;
/// the line break is not put back. Bodies that already contain the ticket base
/// URL are left alone, which makes repeated runs a no-op.
pub fn link_ticket(matcher: &TicketMatcher, body: &str) -> LinkAction {
    if matcher.is_linked(body) {
        return LinkAction::AlreadyLinked;
    }

    let Some(found) = matcher.linkable().find(body) else {
        return LinkAction::NotLinkable;
    };

    let ticket_id: String = found
        .as_str()
        .trim()
        .chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect();
    let link = format!("[{}]({})", ticket_id, matcher.ticket_url(&ticket_id));

    let mut rewritten = String::with_capacity(body.len() + link.len());
    rewritten.push_str(&body[..found.start()]);
    rewritten.push_str(&link);
    rewritten.push_str(&body[found.end()..]);

    LinkAction::Rewritten(rewritten)
}
