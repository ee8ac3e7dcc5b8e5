use camino::Utf8Path;
use sysinfo::System;

pub struct ProcessChecker;

impl ProcessChecker {
    /// True if any running process has its executable somewhere under `root`.
    /// The caller keeps `sys` around so refreshes reuse its buffers.
    pub fn is_running_under(sys: &mut System, root: &Utf8Path) -> bool {
        sys.refresh_processes();

        let root = dunce::canonicalize(root).unwrap_or_else(|_| root.as_std_path().to_path_buf());
        sys.processes()
            .values()
            .filter_map(|p| p.exe())
            .any(|exe| exe.starts_with(&root))
    }
}
