use {
  crate::Error,
  primitive_types::U256,
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    str::FromStr,
  },
};

/// Non-negative integer used for balances, supplies and fees.
///
/// All arithmetic is checked, an operation that would overflow or
/// go below zero returns `None` instead of wrapping.
#[derive(
  Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Big(U256);

impl Big {
  pub fn zero() -> Self {
    Self(U256::zero())
  }

  pub fn is_zero(&self) -> bool {
    self.0.is_zero()
  }

  pub fn is_positive(&self) -> bool {
    !self.0.is_zero()
  }

  pub fn checked_add(&self, other: &Big) -> Option<Big> {
    self.0.checked_add(other.0).map(Self)
  }

  pub fn checked_sub(&self, other: &Big) -> Option<Big> {
    self.0.checked_sub(other.0).map(Self)
  }

  /// 32 bytes, big-endian.
  pub fn bytes(&self) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    self.0.to_big_endian(&mut bytes);
    bytes
  }
}

impl From<u64> for Big {
  fn from(value: u64) -> Self {
    Self(U256::from(value))
  }
}

impl Display for Big {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Debug for Big {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "big({})", self.0)
  }
}

impl FromStr for Big {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    U256::from_dec_str(s)
      .map(Self)
      .map_err(|_| Error::InvalidBig(s.to_owned()))
  }
}

/// Identifier of a currency, 3 to 10 characters of `A-Z` and `0-9`.
#[derive(
  Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CurrencyId(String);

impl CurrencyId {
  pub const MIN_LENGTH: usize = 3;
  pub const MAX_LENGTH: usize = 10;

  pub fn new(id: impl Into<String>) -> Result<Self, Error> {
    let id = Self(id.into());
    id.is_valid()?;
    Ok(id)
  }

  pub fn is_valid(&self) -> Result<(), Error> {
    let len = self.0.len();
    if len < Self::MIN_LENGTH
      || len > Self::MAX_LENGTH
      || !self
        .0
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
      return Err(Error::InvalidCurrencyId(self.0.clone()));
    }
    Ok(())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The id prefixed with its length, so that it can be followed by
  /// other fields in a hashed message.
  pub fn bytes(&self) -> Vec<u8> {
    let mut bytes = vec![self.0.len() as u8];
    bytes.extend_from_slice(self.0.as_bytes());
    bytes
  }
}

impl Display for CurrencyId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl Debug for CurrencyId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "currency({})", self.0)
  }
}

impl FromStr for CurrencyId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::new(s)
  }
}

/// A quantity of exactly one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
  big: Big,
  currency: CurrencyId,
}

impl Amount {
  pub fn new(big: Big, currency: CurrencyId) -> Self {
    Self { big, currency }
  }

  pub fn zero(currency: CurrencyId) -> Self {
    Self::new(Big::zero(), currency)
  }

  pub fn big(&self) -> &Big {
    &self.big
  }

  pub fn currency(&self) -> &CurrencyId {
    &self.currency
  }

  /// Same currency, different quantity.
  pub fn with_big(&self, big: Big) -> Self {
    Self::new(big, self.currency.clone())
  }

  pub fn is_valid(&self) -> Result<(), Error> {
    self.currency.is_valid()
  }

  pub fn bytes(&self) -> Vec<u8> {
    let mut bytes = self.big.bytes().to_vec();
    bytes.extend(self.currency.bytes());
    bytes
  }
}

impl Display for Amount {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}", self.big, self.currency)
  }
}

/// Parses amounts in the `<big>,<currency id>` format.
impl FromStr for Amount {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (big, currency) = s
      .split_once(',')
      .ok_or_else(|| Error::InvalidBig(s.to_owned()))?;
    Ok(Self::new(big.trim().parse()?, currency.trim().parse()?))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn currency_id_rules() {
    assert!(CurrencyId::new("MCC").is_ok());
    assert!(CurrencyId::new("SHOWME").is_ok());
    assert!(CurrencyId::new("A1B2C3D4E5").is_ok());
    assert!(CurrencyId::new("AB").is_err());
    assert!(CurrencyId::new("ABCDEFGHIJK").is_err());
    assert!(CurrencyId::new("mcc").is_err());
    assert!(CurrencyId::new("M-C").is_err());
  }

  #[test]
  fn big_arithmetic_is_checked() -> anyhow::Result<()> {
    let ten = Big::from(10);
    let three = Big::from(3);
    assert_eq!(ten.checked_sub(&three), Some(Big::from(7)));
    assert_eq!(three.checked_sub(&ten), None);

    let max: Big =
      "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        .parse()?;
    assert_eq!(max.checked_add(&Big::from(1)), None);
    assert_eq!(Big::from(1).bytes()[31], 1);
    Ok(())
  }

  #[test]
  fn amount_parse_and_encode() -> anyhow::Result<()> {
    let amount: Amount = "1000,MCC".parse()?;
    assert_eq!(amount, Amount::new(Big::from(1000), CurrencyId::new("MCC")?));
    assert_eq!(amount.to_string(), "1000 MCC");

    let decoded: Amount =
      rmp_serde::from_slice(&rmp_serde::to_vec(&amount)?)?;
    assert_eq!(decoded, amount);

    assert!("1000".parse::<Amount>().is_err());
    assert!("x,MCC".parse::<Amount>().is_err());
    Ok(())
  }
}
