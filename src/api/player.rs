//! Embedded browser player page.
//!
//! A single self-contained HTML document that polls `/metadata` for new
//! recordings and plays `/stream`. Credentials entered for this page are
//! resent by the browser on the same-origin fetches and audio requests.

use actix_web::{get, web, HttpResponse};

use crate::auth::BasicUser;

const PLAYER_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Aircheck</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body { font-family: system-ui, sans-serif; background: #1a1a1a; color: #fff; display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100vh; margin: 0; }
        .player { background: #2d2d2d; padding: 2rem; border-radius: 1rem; box-shadow: 0 4px 6px rgba(0,0,0,0.3); text-align: center; width: 90%; max-width: 400px; }
        h1 { font-size: 1.2rem; margin-bottom: 1rem; color: #aaa; }
        #filename { font-size: 1rem; margin-bottom: 1.5rem; font-weight: bold; color: #4CAF50; word-break: break-all; }
        audio { width: 100%; margin-bottom: 1rem; }
        .status { font-size: 0.8rem; color: #666; }
        button { background: #4CAF50; color: white; border: none; padding: 10px 20px; border-radius: 5px; cursor: pointer; font-size: 1rem; }
        button:hover { background: #45a049; }
    </style>
</head>
<body>
    <div class="player">
        <h1>Latest Recording</h1>
        <div id="filename">Loading...</div>
        <audio id="player" controls autoplay>
            <source src="/stream" type="audio/mpeg">
            Your browser does not support the audio element.
        </audio>
        <div class="status" id="status">Checking for updates...</div>
        <br>
        <button onclick="reload()">Refresh / Play Latest</button>
    </div>

    <script>
        const player = document.getElementById('player');
        const filenameEl = document.getElementById('filename');
        const statusEl = document.getElementById('status');
        let currentFile = null;

        async function poll() {
            try {
                const resp = await fetch('/metadata');
                const meta = await resp.json();

                if (!meta.filename) {
                    filenameEl.textContent = 'No recordings found';
                    return;
                }
                if (!currentFile) {
                    currentFile = meta.filename;
                    filenameEl.textContent = meta.filename;
                } else if (currentFile !== meta.filename) {
                    filenameEl.textContent = meta.filename + ' (new)';
                    statusEl.textContent = 'New recording available';
                }
            } catch (err) {
                console.error(err);
            }
        }

        function reload() {
            player.src = '/stream?t=' + Date.now();
            player.play().catch(() => {});
            fetch('/metadata').then(r => r.json()).then(meta => {
                if (meta.filename) {
                    currentFile = meta.filename;
                    filenameEl.textContent = meta.filename;
                    statusEl.textContent = 'Playing latest';
                }
            });
        }

        poll();
        setInterval(poll, 10000);

        player.onended = () => {
            statusEl.textContent = 'Finished. Checking for new...';
            setTimeout(reload, 2000);
        };
    </script>
</body>
</html>
"#;

/// Serve the player page.
///
/// GET /
#[get("/")]
pub async fn index(_user: BasicUser) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(PLAYER_PAGE)
}

/// Configure the player route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index);
}
