//! 現在有効な設定とその出どころを保持する

use std::path::{
    Path,
    PathBuf,
};

use super::{
    CatalogSettings,
    ConfigError,
    FileMatcher,
    MatcherError,
    loader,
};

/// 設定がどこから来たか
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SettingsOrigin {
    /// 設定ファイルなし
    #[default]
    Defaults,
    /// ワークスペースの `.ts-catalog.json`
    Workspace(PathBuf),
    /// `--config` で渡されたファイル
    File(PathBuf),
    /// `update_settings` で直接渡された
    Programmatic,
}

/// Holds the validated settings of one workspace.
///
/// Settings are only replaced after they pass [`CatalogSettings::validate`],
/// so a failed load leaves the previous state untouched.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 検証済みの設定
    settings: CatalogSettings,
    /// 設定の出どころ
    origin: SettingsOrigin,
    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// デフォルト設定のマネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ワークスペースの設定ファイルを読み込む。ファイルがなければデフォルト設定
    ///
    /// `workspace_root` が `None` の場合はファイルを探さない。
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let found = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?.map(|settings| {
                (settings, SettingsOrigin::Workspace(root.join(super::CONFIG_FILE_NAME)))
            }),
            None => None,
        };
        let (settings, origin) = found.unwrap_or_default();
        self.replace(settings, origin, workspace_root)
    }

    /// 明示的に指定された設定ファイルを読み込む
    pub fn load_settings_from_file(
        &mut self,
        config_path: &Path,
        workspace_root: Option<PathBuf>,
    ) -> Result<(), ConfigError> {
        let settings = loader::load_from_file(config_path)?;
        self.replace(settings, SettingsOrigin::File(config_path.to_path_buf()), workspace_root)
    }

    /// 設定を差し替える。ワークスペースルートは変えない
    pub fn update_settings(&mut self, new_settings: CatalogSettings) -> Result<(), ConfigError> {
        let root = self.workspace_root.take();
        let result = self.replace(new_settings, SettingsOrigin::Programmatic, root.clone());
        if result.is_err() {
            self.workspace_root = root;
        }
        result
    }

    /// 検証に通った場合のみ状態を置き換える
    fn replace(
        &mut self,
        settings: CatalogSettings,
        origin: SettingsOrigin,
        workspace_root: Option<PathBuf>,
    ) -> Result<(), ConfigError> {
        if let Err(errors) = settings.validate() {
            tracing::warn!(?origin, count = errors.len(), "Rejected invalid settings");
            return Err(ConfigError::ValidationErrors(errors));
        }

        tracing::debug!(?origin, ?workspace_root, "Settings applied");
        self.settings = settings;
        self.origin = origin;
        self.workspace_root = workspace_root;
        Ok(())
    }

    #[must_use]
    pub const fn get_settings(&self) -> &CatalogSettings {
        &self.settings
    }

    #[must_use]
    pub const fn origin(&self) -> &SettingsOrigin {
        &self.origin
    }

    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// 現在の設定からファイルマッチャーを作成
    pub fn file_matcher(&self, workspace_root: PathBuf) -> Result<FileMatcher, MatcherError> {
        FileMatcher::new(workspace_root, &self.settings)
    }
}
