//! Help navigation bar component

use maud::{Markup, html};

/// Renders the navigation bar above a help page
///
/// Shows a link back to the home page and the current page id. The home
/// link is omitted on the home page itself.
///
/// # Arguments
///
/// * `home_href`: Link target of the home page
/// * `current`: Page id being displayed
/// * `is_home`: Whether the current page is the home page
///
/// # Returns
///
/// Navigation markup
pub fn nav_bar(home_href: &str, current: &str, is_home: bool) -> Markup {
    html! {
        header {
            nav class="help-nav" {
                @if is_home {
                    span class="help-nav-current" { "Help" }
                } @else {
                    a href=(home_href) class="help-nav-link" { "Help" }
                    span class="help-nav-separator" { "/" }
                    span class="help-nav-current" { (current) }
                }
            }
        }
    }
}
