//! シリアルコマンドの解釈
//!
//! 1文字のキー入力をユーザーコマンドに変換します。

/// ユーザーコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// アイドルモード要求
    Idle,
    /// パワーモード要求
    Power,
    /// デューティ比（三相時は振幅）を上げる
    DutyUp,
    /// デューティ比（三相時は振幅）を下げる
    DutyDown,
    /// 周波数を上げる
    FrequencyUp,
    /// 周波数を下げる
    FrequencyDown,
    /// ヘルプ表示
    Help,
}

impl Command {
    /// 受信文字からコマンドを取得（未定義の文字は`None`）
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'i' => Some(Command::Idle),
            b'p' => Some(Command::Power),
            b'u' => Some(Command::DutyUp),
            b'j' => Some(Command::DutyDown),
            b'o' => Some(Command::FrequencyUp),
            b'l' => Some(Command::FrequencyDown),
            b'h' => Some(Command::Help),
            _ => None,
        }
    }
}

/// ヘルプメニュー
pub const HELP_MENU: [&str; 9] = [
    " ________________________________________ ",
    "|     ------- MENU ---------             |",
    "|     press i : idle mode                |",
    "|     press p : power mode               |",
    "|     press u : duty / amplitude UP      |",
    "|     press j : duty / amplitude DOWN    |",
    "|     press o : frequency UP             |",
    "|     press l : frequency DOWN           |",
    "|________________________________________|",
];
