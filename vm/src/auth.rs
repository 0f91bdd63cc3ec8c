use {
  crate::{AuthError, Error},
  currency_primitives::{FactSign, Keys, ToBase58String},
  ed25519_dalek::PublicKey,
  serde::{Deserialize, Serialize},
  std::collections::HashSet,
};

/// Checks that the signers of an operation carry enough weight in
/// `keys` to authorize it.
///
/// Signature validity is not checked here, signed operations verify
/// their signatures before they reach authorization.
pub fn check_threshold(
  signs: &[FactSign],
  keys: &Keys,
) -> Result<(), AuthError> {
  let mut sum = 0;
  for sign in signs {
    match keys.key(sign.signer()) {
      Some(key) => sum += key.weight(),
      None => return Err(AuthError::UnknownSigner(sign.signer().to_b58())),
    }
  }

  if sum < keys.threshold() {
    return Err(AuthError::ThresholdNotMet {
      sum,
      threshold: keys.threshold(),
    });
  }

  Ok(())
}

/// Share of the suffrage, in percent, that must sign a governance
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffrageThreshold(u8);

impl SuffrageThreshold {
  pub fn new(percent: u8) -> Result<Self, Error> {
    if !(1..=100).contains(&percent) {
      return Err(Error::Validation(
        currency_primitives::Error::ThresholdOutOfRange(percent as u64),
      ));
    }
    Ok(Self(percent))
  }

  pub fn percent(&self) -> u8 {
    self.0
  }

  /// Number of signers required out of `total`, rounded up.
  pub fn required(&self, total: usize) -> usize {
    (total * self.0 as usize + 99) / 100
  }
}

impl Default for SuffrageThreshold {
  fn default() -> Self {
    Self(67)
  }
}

/// The network governance key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suffrage {
  publickeys: Vec<PublicKey>,
  threshold: SuffrageThreshold,
}

impl Suffrage {
  pub fn new(publickeys: Vec<PublicKey>, threshold: SuffrageThreshold) -> Self {
    Self {
      publickeys,
      threshold,
    }
  }

  pub fn publickeys(&self) -> &[PublicKey] {
    &self.publickeys
  }

  pub fn threshold(&self) -> SuffrageThreshold {
    self.threshold
  }

  /// Counts distinct suffrage members among the signers. Signers that
  /// are not members do not count and do not fail the check.
  pub fn check(&self, signs: &[FactSign]) -> Result<(), AuthError> {
    if self.publickeys.is_empty() {
      return Err(AuthError::EmptyPublickeys);
    }

    let members: HashSet<_> =
      self.publickeys.iter().map(|pk| pk.as_bytes()).collect();
    let signed = signs
      .iter()
      .map(|s| s.signer().as_bytes())
      .filter(|pk| members.contains(pk))
      .collect::<HashSet<_>>()
      .len();

    let required = self.threshold.required(members.len());
    if signed < required {
      return Err(AuthError::NotEnoughSuffrageSigns { signed, required });
    }

    Ok(())
  }
}
