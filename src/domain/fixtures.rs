/// `sl ssl` output with a local stack, a second fork, and a trunk commit.
pub(crate) const EXAMPLE_SMARTLOG: &str = "  o  7a8a6054a  May 09 at 11:16  roy.rothenberg  #3 Unreviewed ✗
  │  commit 3
  │
  @  04b66ceaf  May 09 at 11:22  roy.rothenberg
╭─╯  commit 2
│
│ o  b693b742c  May 09 at 13:56  roy.rothenberg  #2 Merged ✓
├─╯  commit 2
│
o  b7e6cf068  May 09 at 11:21  roy.rothenberg  remote/main
│  commit 1
~";
