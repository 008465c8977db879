use app_state::PaymentSettings;
use common_types::{PaymentHash, User};
use std::fmt::Write;
use url::Url;

/// The form handed to the hosted payment page. Submitting it leaves the app;
/// the payment provider redirects back to the configured return or cancel url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub action: Url,
    pub fields: Vec<(&'static str, String)>,
}

impl CheckoutForm {
    #[must_use]
    pub fn new(settings: &PaymentSettings, payment: &PaymentHash, customer: Option<&User>) -> Self {
        let currency = if payment.currency.is_empty() {
            settings.currency.clone()
        } else {
            payment.currency.clone()
        };
        let mut fields = vec![
            ("merchant_id", settings.merchant_id.clone()),
            ("return_url", settings.return_url.to_string()),
            ("cancel_url", settings.cancel_url.to_string()),
            ("order_id", payment.order_id.clone()),
            (
                "items",
                payment
                    .items
                    .clone()
                    .unwrap_or_else(|| format!("Reservation {}", payment.order_id)),
            ),
            ("currency", currency),
            ("amount", format!("{:.2}", payment.amount)),
            ("hash", payment.hash.clone()),
        ];
        if let Some(customer) = customer {
            let (first, last) = customer
                .name
                .split_once(' ')
                .unwrap_or((customer.name.as_str(), ""));
            fields.push(("first_name", first.to_owned()));
            fields.push(("last_name", last.to_owned()));
            fields.push(("email", customer.email.clone()));
        }
        Self {
            action: settings.checkout_url.clone(),
            fields,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// A page that posts the form as soon as it loads.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<body onload=\"document.forms[0].submit()\">\n",
        );
        let _ = writeln!(
            html,
            "<form method=\"post\" action=\"{}\">",
            escape_html(self.action.as_str())
        );
        for (name, value) in &self.fields {
            let _ = writeln!(
                html,
                "  <input type=\"hidden\" name=\"{name}\" value=\"{}\">",
                escape_html(value)
            );
        }
        html.push_str("  <noscript><button type=\"submit\">Continue to payment</button></noscript>\n");
        html.push_str("</form>\n</body>\n</html>\n");
        html
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
