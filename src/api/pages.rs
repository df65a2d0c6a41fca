//! Inline HTML views. The service has exactly four pages: a landing page, the
//! prompt form, a success page carrying the playlist link, and one generic
//! failure page shared by every error kind.

pub const LANDING: &str = r#"<!DOCTYPE html>
<html>
<head><title>Prompt Playlist</title></head>
<body>
  <h1>Prompt Playlist</h1>
  <p>Describe the music you want to hear and get a Spotify playlist back.</p>
  <p><a href="/playlist">Create a playlist</a></p>
</body>
</html>"#;

pub const PLAYLIST_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Create a playlist</title></head>
<body>
  <h1>Create a playlist</h1>
  <form method="post" action="/playlist">
    <label>Prompt <input type="text" name="Prompt" required></label><br>
    <label>Length <input type="number" name="Length" min="1" placeholder="10"></label><br>
    <label>Name <input type="text" name="Name" placeholder="defaults to the prompt"></label><br>
    <button type="submit">Generate</button>
  </form>
</body>
</html>"#;

pub fn playlist_created(url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Playlist ready</title></head>
<body>
  <h1>Your playlist is ready</h1>
  <p><a href="{url}">{url}</a></p>
  <p><a href="/playlist">Make another one</a></p>
</body>
</html>"#
    )
}

pub fn failure() -> &'static str {
    r#"<!DOCTYPE html>
<html>
<head><title>Something went wrong</title></head>
<body>
  <h1>sorry try again!</h1>
  <p><a href="/playlist">Back to the form</a></p>
</body>
</html>"#
}
