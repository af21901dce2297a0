//! Landing page listing every registered endpoint.

use std::fmt::{self, Write};

use axum::{
    http::{Method, StatusCode},
    response::Response,
};

use super::Endpoint;
use crate::http::response;

pub fn home(listing: &[(Method, String, Endpoint)]) -> Response {
    match render(listing) {
        Ok(page) => response::html(page),
        Err(_) => response::text(StatusCode::INTERNAL_SERVER_ERROR, "Error rendering page"),
    }
}

fn render(listing: &[(Method, String, Endpoint)]) -> Result<String, fmt::Error> {
    let mut page = String::new();
    writeln!(page, "<!DOCTYPE html>")?;
    writeln!(page, "<html lang=\"en\">")?;
    writeln!(page, "<head>")?;
    writeln!(page, "  <meta charset=\"UTF-8\">")?;
    writeln!(page, "  <title>MockHTTP - Home</title>")?;
    writeln!(page, "</head>")?;
    writeln!(page, "<body>")?;
    writeln!(page, "  <h1>Welcome to MockHTTP</h1>")?;
    writeln!(
        page,
        "  <p>A simple HTTP request &amp; response service, inspired by httpbin.org.</p>"
    )?;
    writeln!(page, "  <ul>")?;
    for (method, template, endpoint) in listing {
        writeln!(
            page,
            "    <li>{method} <a href=\"{href}\">{template}</a> - {description}</li>",
            href = endpoint.example_path(template),
            template = response::escape_html(template),
            description = endpoint.description(),
        )?;
    }
    writeln!(page, "  </ul>")?;
    writeln!(page, "</body>")?;
    writeln!(page, "</html>")?;
    Ok(page)
}
