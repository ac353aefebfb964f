//! Static candidate catalog: the name groups the generator combines.

/// Files probed as-is (credentials, shell history, VCS and IDE leftovers).
pub const LITERALS: &[&str] = &[
    ".aws/credentials",
    ".aws/config",
    ".bash_history",
    ".bashrc",
    ".config/gcloud/credentials.db",
    ".config/gcloud/credentials.json",
    ".config/openvpn/auth.txt",
    ".docker/config.json",
    ".git-credentials",
    ".git/config",
    ".gitconfig",
    ".htpasswd",
    ".idea/workspace.xml",
    ".idea/dataSources.xml",
    ".kube/config",
    ".mysql_history",
    ".netrc",
    ".npmrc",
    ".pgpass",
    ".psql_history",
    ".python_history",
    ".pypirc",
    ".s3cfg",
    ".ssh/authorized_keys",
    ".ssh/id_dsa",
    ".ssh/id_ecdsa",
    ".ssh/id_ed25519",
    ".ssh/id_rsa",
    ".ssh/known_hosts",
    ".svn/entries",
    ".vscode/settings.json",
    ".vscode/sftp.json",
    ".zsh_history",
    ".zshrc",
    "debug.log",
    "error.log",
    "error_log",
    "ftp-sync.json",
    "sftp-config.json",
    "storage/logs/laravel.log",
    "WS_FTP.LOG",
];

/// Generic archive and dump base names; combined with [`ARCHIVE_EXTENSIONS`].
pub const ARCHIVE_NAMES: &[&str] = &[
    "archive", "backup", "backups", "back", "bak", "data", "database", "db", "db_backup",
    "db_dump", "db_export", "dump", "export", "files", "html", "htdocs", "old", "public_html",
    "site", "src", "web", "www", "wwwroot",
];

pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".7z", ".bz2", ".gz", ".rar", ".sql", ".sql.gz", ".sql.zip", ".tar", ".tar.bz2", ".tar.gz",
    ".tar.xz", ".tgz", ".zip",
];

/// Application config files that editors and deploy scripts leave copies of.
pub const CONFIG_FILES: &[&str] = &[
    "app/etc/env.php",
    "application/config/database.php",
    "config.inc.php",
    "config.local.php",
    "config.php",
    "config/database.yml",
    "config/settings.inc.php",
    "configuration.php",
    "contentbase.php",
    "database.php",
    "db.php",
    "local.xml",
    "settings.php",
    "sites/default/settings.php",
    "web.config",
    "wp-config.php",
];

/// Leftover suffixes for [`CONFIG_FILES`].
pub const LEFTOVER_SUFFIXES: &[&str] = &[
    ".bak", ".backup", ".dist", ".old", ".orig", ".save", ".swp", ".tmp", ".txt", "~",
];

/// Deployment stages appended to environment and container files.
pub const STAGES: &[&str] = &["", ".dev", ".development", ".local", ".prod", ".production", ".stage", ".test"];

/// Dotenv base names; combined with [`STAGES`].
pub const ENV_FILES: &[&str] = &[".env", "env", ".env.backup", ".env.example"];

/// Docker compose prefixes (`docker-compose`, `compose`) and variants.
pub const COMPOSE_PREFIXES: &[&str] = &["docker-compose", "compose"];
pub const COMPOSE_VARIANTS: &[&str] = &["", ".override"];
pub const COMPOSE_EXTENSIONS: &[&str] = &[".yml", ".yaml"];

/// Container build files; combined with [`STAGES`].
pub const BUILD_FILES: &[&str] = &["Dockerfile", "Containerfile"];

/// Suffixes used to turn the hostname into likely dump names.
pub const HOST_EXTENSIONS: &[&str] = &[".sql", ".sql.gz", ".tar.gz", ".tgz", ".zip", ".rar", ".7z"];
