// Shared fixture-server helpers.
//
// Routes mirror a small target application: status endpoints, an echo-style
// endpoint, and a three-hop redirect chain ending on a plain text page.

use httptest::{matchers::*, responders::*, Expectation, Server};

/// Mounts a GET route answering with a bare status code.
#[allow(dead_code)] // Used by other test files
pub fn mount_status(server: &Server, path: &'static str, status: u16) {
    server.expect(
        Expectation::matching(request::method_path("GET", path))
            .times(..)
            .respond_with(status_code(status)),
    );
}

/// Mounts a GET route answering 200 with a text/html body.
#[allow(dead_code)] // Used by other test files
pub fn mount_html(server: &Server, path: &'static str, body: &'static str) {
    server.expect(
        Expectation::matching(request::method_path("GET", path))
            .times(..)
            .respond_with(
                status_code(200)
                    .insert_header("Content-Type", "text/html; charset=utf-8")
                    .insert_header("X-Powered-By", "Express")
                    .body(body),
            ),
    );
}

/// Mounts the redirect chain `/` -> `/movies` -> `/movies/all` ->
/// `/movies/all/0`, which resolves to a plain text page.
#[allow(dead_code)] // Used by other test files
pub fn mount_movie_chain(server: &Server) {
    let hops: &[(&str, &str)] = &[
        ("/", "/movies"),
        ("/movies", "/movies/all"),
        ("/movies/all", "/movies/all/0"),
    ];
    for (path, location) in hops {
        server.expect(
            Expectation::matching(request::method_path("GET", *path))
                .times(..)
                .respond_with(
                    status_code(302)
                        .insert_header("Location", *location)
                        .body(format!("Moved Temporarily. Redirecting to {}", location)),
                ),
        );
    }
    server.expect(
        Expectation::matching(request::method_path("GET", "/movies/all/0"))
            .times(..)
            .respond_with(
                status_code(200)
                    .insert_header("Content-Type", "text/plain")
                    .body("first movie page"),
            ),
    );
}
