use crate::models::error::SError;
use camino::{Utf8Path, Utf8PathBuf};
use dunce::canonicalize;

/// Resolves `candidate` and checks that it lies strictly below `root`.
///
/// The root and the candidate's parent are canonicalized, so `..` segments and
/// symlinked roots compare by their real location. The final component is kept
/// as given: a symlinked mod stays the link, not its target. The root itself is
/// never a valid candidate.
pub fn ensure_within(root: &Utf8Path, candidate: &Utf8Path) -> Result<Utf8PathBuf, SError> {
    let escape = || SError::PathEscape(candidate.to_string());

    let root = canonicalize(root).map_err(|_| escape())?;
    let resolved = resolve(candidate).ok_or_else(escape)?;

    if resolved != root && resolved.starts_with(&root) {
        Utf8PathBuf::from_path_buf(resolved).map_err(|_| escape())
    } else {
        Err(escape())
    }
}

/// Like [`ensure_within`], accepting the first root that contains the candidate.
pub fn ensure_within_any<'a, I>(roots: I, candidate: &Utf8Path) -> Result<Utf8PathBuf, SError>
where
    I: IntoIterator<Item = &'a Utf8Path>,
{
    roots
        .into_iter()
        .find_map(|root| ensure_within(root, candidate).ok())
        .ok_or_else(|| SError::PathEscape(candidate.to_string()))
}

fn resolve(candidate: &Utf8Path) -> Option<std::path::PathBuf> {
    let name = candidate.file_name()?;
    if name == ".." || name == "." {
        return None;
    }
    let parent = candidate.parent()?;
    let parent = if parent.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        parent
    };
    canonicalize(parent).ok().map(|p| p.join(name))
}
