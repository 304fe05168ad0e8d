use std::{fs, io::Write, path::Path};

/// Write `bytes` to `path` through a sibling temp file, fsync, then rename,
/// so readers never observe a half-written profile.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.new");
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(tmp, path)
}
