use crate::error::Error;

#[derive(Clone, Debug)]
pub enum Promise<T, D = (), E = Error> {
    Empty,
    Deferred(D),
    Resolved(T),
    Rejected(E),
}

impl<T, D, E> Promise<T, D, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    pub fn is_deferred(&self, def: &D) -> bool
    where
        D: PartialEq,
    {
        matches!(self, Self::Deferred(d) if d == def)
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }

    pub fn defer(&mut self, def: D) {
        *self = Self::Deferred(def);
    }

    fn resolve_or_reject(&mut self, res: Result<T, E>) {
        *self = match res {
            Ok(ok) => Self::Resolved(ok),
            Err(err) => Self::Rejected(err),
        };
    }

    /// Settles the promise only if it is still waiting on `def`. Returns whether
    /// the result was taken.
    pub fn update(&mut self, (def, res): (D, Result<T, E>)) -> bool
    where
        D: PartialEq,
    {
        if self.is_deferred(&def) {
            self.resolve_or_reject(res);
            true
        } else {
            false
        }
    }
}
