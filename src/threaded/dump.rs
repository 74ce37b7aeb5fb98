use super::{Right, ThreadedMap};
use std::fmt::Display;
use std::io::{self, Write};

const RULE: &str = "**************************************************";
const BANNER: &str = "********************* BSTT ***********************";

impl<K: Display, V: Display> ThreadedMap<K, V> {
    /// Writes a listing of the map to out, one entry per line in ascending
    /// key order.
    ///
    /// An entry is printed as `(key,value)`, or as `(key,value,next)` when its
    /// node threads to the node holding `next`.  The listing is framed by a
    /// header, a size line and a footer.
    ///
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m = ThreadedMap::from([(2, 20), (1, 10)]);
    /// let mut out = Vec::new();
    /// m.dump(&mut out)?;
    ///
    /// let text = String::from_utf8(out).unwrap();
    /// let lines: Vec<_> = text.lines().collect();
    /// assert_eq!(lines[2], "** size: 2");
    /// assert_eq!(lines[3], "(1,10,2)");
    /// assert_eq!(lines[4], "(2,20)");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn dump<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "{BANNER}")?;
        writeln!(out, "** size: {}", self.len())?;

        let mut curr = self.root.map(|id| self.leftmost(id));
        while let Some(id) = curr {
            let n = self.node(id);
            match n.right {
                Right::Thread(t) => writeln!(
                    out,
                    "({},{},{})",
                    n.key,
                    n.val,
                    self.node(t).key
                )?,
                Right::Child(_) | Right::Empty => {
                    writeln!(out, "({},{})", n.key, n.val)?
                }
            }
            curr = self.in_order_next(id);
        }

        writeln!(out, "{RULE}")
    }
}
