use crate::data_structs::typedef::TemplateIdType;
use crate::error::PatternError;

/// Read-only handle over the per-template call strings and sequences.
///
/// Both arrays are owned by the caller and indexed by
/// [`Read::templid`](crate::Read). Character `i` of either string corresponds
/// to the reference position `read.start + i`.
#[derive(Debug)]
pub struct TemplateStore<'a, S: AsRef<[u8]>> {
    calls: &'a [S],
    seqs:  &'a [S],
}

impl<S: AsRef<[u8]>> Clone for TemplateStore<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: AsRef<[u8]>> Copy for TemplateStore<'_, S> {}

impl<'a, S: AsRef<[u8]>> TemplateStore<'a, S> {
    pub fn try_new(
        calls: &'a [S],
        seqs: &'a [S],
    ) -> Result<Self, PatternError> {
        if calls.len() != seqs.len() {
            return Err(PatternError::TemplateStoreMismatch {
                calls: calls.len(),
                seqs:  seqs.len(),
            });
        }
        Ok(Self { calls, seqs })
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn call_string(
        &self,
        templid: TemplateIdType,
    ) -> Option<&'a [u8]> {
        let calls: &'a [S] = self.calls;
        calls.get(templid).map(AsRef::as_ref)
    }

    pub fn sequence(
        &self,
        templid: TemplateIdType,
    ) -> Option<&'a [u8]> {
        let seqs: &'a [S] = self.seqs;
        seqs.get(templid).map(AsRef::as_ref)
    }
}
