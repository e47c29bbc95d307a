use jsonwebtoken::{DecodingKey, EncodingKey};

/// KeyRing は署名シークレットの順序付きリストを表す。
///
/// 先頭（index 0）がエンコード用の現行キー。デコードは全キーを先頭から順に
/// 試すため、新キーを先頭に追加し旧キーを後方に残すことで、発行済みトークンを
/// 無効化せずにローテーションできる。旧キーは、そのキーで署名されたトークンが
/// 残存しえなくなった時点（アクセス/リフレッシュ最大年齢の長い方が経過）で
/// リストから除去してよい。
pub struct KeyRing {
    keys: Vec<RingKey>,
}

struct RingKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyRing {
    /// 設定のシークレットリストからキーリングを構築する。空リストはエラー。
    pub fn new(secrets: &[String]) -> anyhow::Result<Self> {
        if secrets.is_empty() {
            anyhow::bail!("auth.secret_keys must contain at least one key");
        }
        let keys = secrets
            .iter()
            .map(|s| RingKey {
                encoding: EncodingKey::from_secret(s.as_bytes()),
                decoding: DecodingKey::from_secret(s.as_bytes()),
            })
            .collect();
        Ok(Self { keys })
    }

    /// エンコードに使う現行キー（常に index 0）。
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.keys[0].encoding
    }

    /// デコード候補キーをリング順に返す。
    pub fn decoding_keys(&self) -> impl Iterator<Item = &DecodingKey> {
        self.keys.iter().map(|k| &k.decoding)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_list_is_rejected() {
        let result = KeyRing::new(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn keeps_all_keys_in_order() {
        let ring = KeyRing::new(&["new-key".to_string(), "old-key".to_string()]).unwrap();
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.decoding_keys().count(), 2);
        assert!(!ring.is_empty());
    }
}
