use {
  crate::{Error, Keys},
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
  },
};

/// Represents an address of an account.
///
/// An address is the sha256 digest of the canonical bytes of the
/// keys that were used to open the account. Replacing the keys of an
/// existing account does not change its address, so after the first
/// key update the address no longer matches the current keys.
#[derive(
  Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
  /// Derives the address of an account opened with the given keys.
  pub fn from_keys(keys: &Keys) -> Self {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(keys.hash().digest());
    Self(bytes)
  }

  pub fn bytes(&self) -> &[u8] {
    &self.0
  }
}

impl From<&Keys> for Address {
  fn from(keys: &Keys) -> Self {
    Self::from_keys(keys)
  }
}

impl AsRef<[u8]> for Address {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Deref for Address {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", bs58::encode(self.0).into_string())
  }
}

impl Debug for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "address({})", bs58::encode(self.0).into_string())
  }
}

impl From<Address> for String {
  fn from(addr: Address) -> Self {
    bs58::encode(addr.0).into_string()
  }
}

impl FromStr for Address {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let decoded = bs58::decode(s)
      .into_vec()
      .map_err(|e| Error::InvalidAddress(e.to_string()))?;
    let bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| {
      Error::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;
    Ok(Self(bytes))
  }
}

impl TryFrom<&str> for Address {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    FromStr::from_str(value)
  }
}
