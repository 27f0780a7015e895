//! Alert messages displayed to users via the `#alert-container` element.
//!
//! Endpoints return these as response bodies; the htmx response-targets
//! extension swaps them into the alert container on error responses.

use maud::{Markup, PreEscaped, html};

/// A dismissible message shown at the bottom of the page.
pub enum Alert {
    /// A green alert confirming an action succeeded.
    #[allow(dead_code)]
    Success {
        /// The headline shown in bold.
        message: String,
        /// Extra detail shown below the headline.
        details: String,
    },
    /// A red alert explaining why an action failed.
    Error {
        /// The headline shown in bold.
        message: String,
        /// Extra detail shown below the headline.
        details: String,
    },
}

impl Alert {
    /// Render the alert, including the script that reveals the alert
    /// container it is swapped into.
    pub fn into_markup(self) -> Markup {
        let (message, details, container_style, text_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "flex items-start gap-3 p-4 rounded-lg border border-green-300 \
                bg-green-50 dark:bg-gray-800 dark:border-green-800",
                "text-sm text-green-800 dark:text-green-400",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "flex items-start gap-3 p-4 rounded-lg border border-red-300 \
                bg-red-50 dark:bg-gray-800 dark:border-red-800",
                "text-sm text-red-800 dark:text-red-400",
            ),
        };

        html! {
            div role="alert" class=(container_style)
            {
                div class=(text_style)
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty()
                    {
                        p { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto text-gray-400 hover:text-gray-900 dark:hover:text-white"
                    aria-label="Close"
                    onclick="dismissAlert()"
                {
                    "✕"
                }
            }

            script
            {
                (PreEscaped(r#"
                document.getElementById('alert-container').classList.remove('hidden');

                function dismissAlert() {
                    const container = document.getElementById('alert-container');
                    container.classList.add('hidden');
                    container.innerHTML = '';
                }
                "#))
            }
        }
    }
}
