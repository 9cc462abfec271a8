use crate::byte_size::{ByteSize, UNLIMITED, effective_upload_limit};

/// デフォルトのリクエストボディ上限 (8MB)
pub const DEFAULT_POST_MAX_SIZE: &str = "8M";

/// デフォルトのファイル単体上限 (2MB)
pub const DEFAULT_UPLOAD_MAX_FILESIZE: &str = "2M";

/// デフォルトの 1 リクエストあたり最大ファイル数
pub const DEFAULT_MAX_FILE_COUNT: usize = 20;

/// アップロードの制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    /// ファイル 1 つあたりの最大サイズ (デフォルト: 2MB)
    ///
    /// これを超えるファイルパートは一時ファイルを作らず
    /// [`UploadError::SizeExceeded`](crate::upload::UploadError::SizeExceeded) として記録される。
    pub max_file_size: ByteSize,
    /// 1 回のパースで受け付ける最大ファイル数 (デフォルト: 20)
    ///
    /// 上限に達した後のファイルパートは記録されずに捨てられる。
    pub max_file_count: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: effective_upload_limit(
                DEFAULT_POST_MAX_SIZE,
                DEFAULT_UPLOAD_MAX_FILESIZE,
            ),
            max_file_count: DEFAULT_MAX_FILE_COUNT,
        }
    }
}

impl UploadLimits {
    /// 制限なしの設定を作成
    pub fn unlimited() -> Self {
        Self {
            max_file_size: UNLIMITED,
            max_file_count: usize::MAX,
        }
    }

    /// 設定ファイル由来の文字列から制限を作成
    ///
    /// 呼び出し側の設定ローダーが読み込んだ値を渡す。
    /// `max_file_uploads` が 10 進数として解釈できない場合はデフォルト値を使う。
    ///
    /// # 例
    ///
    /// ```rust
    /// use shiguredo_form_data::UploadLimits;
    ///
    /// let limits = UploadLimits::from_ini_values("16M", "4M", "5");
    /// assert_eq!(limits.max_file_size, 4 * 1024 * 1024);
    /// assert_eq!(limits.max_file_count, 5);
    /// ```
    pub fn from_ini_values(
        post_max_size: &str,
        upload_max_filesize: &str,
        max_file_uploads: &str,
    ) -> Self {
        Self {
            max_file_size: effective_upload_limit(post_max_size, upload_max_filesize),
            max_file_count: max_file_uploads
                .trim()
                .parse()
                .unwrap_or(DEFAULT_MAX_FILE_COUNT),
        }
    }
}
