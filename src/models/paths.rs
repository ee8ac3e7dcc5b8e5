use camino::{Utf8Path, Utf8PathBuf};

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

// Probe order matters: the first parseable candidate wins.
define_paths!(ManifestPaths {
    root: "manifest.json",
    server: "Server/manifest.json",
    source_project: "src/main/resources/manifest.json",
});

impl ManifestPaths {
    pub fn candidates(&self) -> [&Utf8Path; 3] {
        [&self.root, &self.server, &self.source_project]
    }
}

define_paths!(InstallPathRules {
    user_data: "UserData",
    mods: "UserData/Mods",
    packs: "UserData/Packs",
    saves: "UserData/Saves",
    early_plugins: "earlyplugins",
});

define_paths!(DataPathRules {
    disabled: "disabled",
    deleted: "deleted",
    projects: "projects",
    logs: "logs",
    profiles_db: "profiles.db",
});

define_paths!(WorldPaths {
    config: "config.json",
});
