/*!

This is the long-form manual for `social_choice` and `socialchoice`.

## Profiles

A profile gives, for every voter, a complete ranking of the candidates `1..=n`,
most preferred first. All the voters rank all the candidates: a profile with
missing, duplicated or out-of-range candidates is rejected. The voters are
kept in the order in which they were provided.

The rank of a candidate for a voter starts at 0 (most preferred) and ends at
`n - 1` (least preferred).

## Rules

### Dictatorship

The winner is the candidate ranked first by the designated voter.

### Scoring rules

A score vector `s` of length `n` gives `s[r]` points to the candidate at rank
`r`, for every voter. The candidate with the most points wins.

| rule        | score vector              |
|-------------|---------------------------|
| `plurality` | `[1, 0, ..., 0]`          |
| `veto`      | `[1, ..., 1, 0]`          |
| `borda`     | `[n-1, n-2, ..., 1, 0]`   |
| `scoring`   | any vector of length `n`  |

### STV

The Single Transferable Vote runs in rounds. In each round, every voter
supports their first candidate still running, and all the candidates with the
lowest support are eliminated at once. Note that this differs from the
textbook version, which eliminates a single candidate per round.

With the default termination (`firstRound`), the count stops after the first
round: if a single candidate is left, this candidate wins; otherwise the
tie-breaking voter picks the winner among the remaining candidates. With
`lastStanding`, rounds continue until a single candidate is left.

If all the remaining candidates share the lowest support, nobody is
eliminated and the tie-breaking voter picks the winner among them.

### Ties

Every rule except dictatorship takes a tie-breaking voter. When several
candidates are tied, the winner is the first of them in the ranking of this
voter. This voter only needs to exist in the profile when a tie actually
happens.

## Input format

`socialchoice` reads an election description in JSON:

```text
{
  "outputSettings": {
    "contestName": "Board chair",
    "contestDate": "2026-10-17",
    "contestJurisdiction": "Chess club",
    "contestOffice": "Chair"
  },
  "candidates": [{"name": "Alice"}, {"name": "Bob"}, {"name": "Carol"}],
  "ballots": [
    {"voter": 1, "ranking": [1, 2, 3]},
    {"voter": 2, "ranking": ["Bob", "Carol", "Alice"]}
  ],
  "rules": {"rule": "stv", "tieBreakVoter": 1, "stvTermination": "lastStanding"}
}
```

- `candidates` (optional): the i-th entry is the name of candidate `i + 1`.
 When provided, rankings may refer to candidates by name.
- `ballots`: one entry per voter. Voter numbers must be distinct.
- `rules.rule`: one of `dictatorship`, `scoring`, `plurality`, `veto`, `borda`, `stv`.
- `rules.tieBreakVoter`: required by all the rules but `dictatorship`.
- `rules.dictator`: required by `dictatorship`.
- `rules.scoreVector`: required by `scoring`, one entry per candidate.
- `rules.stvTermination` (optional): `firstRound` (default) or `lastStanding`.

The rule and its parameters can be overridden on the command line with
`--rule`, `--tie-break`, `--agent` and `--score-vector`.

## Output

The summary is written in JSON (to the standard output unless `--out` is given):

```text
{
  "config": {"contest": "Board chair", "rule": "stv", "tieBreakVoter": "1", ...},
  "results": {
    "winner": "Alice",
    "tiebreak": false,
    "tally": {},
    "rounds": [{"round": 1, "tally": {"Alice": "2", "Bob": "1", "Carol": "1"},
                "eliminated": ["Bob", "Carol"]}]
  }
}
```

Counts are written as strings. When `--reference` points to a previous
summary, the program prints the differences and fails if they do not match.

 */
