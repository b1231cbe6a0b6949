/*!

This is the long-form manual for `election_map` and `electionmap`.

## The data file

All pages read one JSON document, usually published as `elections.json`:

```json
{
  "lastUpdated": "2024-09-01T12:00:00Z",
  "contactEmail": "team@example.org",
  "electionData": {
    "CA": {
      "stateName": "California",
      "registrationDeadline": "2024-10-21",
      "registrationWebsite": "https://registertovote.ca.gov/",
      "elections": [
        {
          "title": "Governor",
          "date": "2026-11-03",
          "type": "General",
          "chamberImpact": "State",
          "stakes": "Open seat",
          "competitive": true,
          "candidates": [
            { "name": "Alice", "party": "Democratic", "incumbent": false },
            { "name": "Bob", "party": "Republican" }
          ]
        }
      ]
    }
  }
}
```

Notes:
- region codes must be unique. A document that repeats a code is rejected.
- `lastUpdated`, `contactEmail`, `registrationDeadline`, `registrationWebsite`,
  `electionsOver`, `stakes`, `competitive`, `candidates` and `incumbent` may be omitted.
- `chamberImpact` is one of `Local`, `State`, `House`, `Senate`. Any other
  value (`Referendum`, `Ballot Measure`, ...) is counted, colored and filtered
  as `Other`. The original label is still shown on the badge.
- `party` is `Republican`, `Democratic` or anything else, which is displayed as
  independent.
- `electionsOver: true` marks a region whose cycle has concluded.

## The palette

The colors of the map are a table of rules. The first rule whose condition
holds for a region decides its colors. Regions that match no rule use
`default`, and regions that are not in the data file at all use `base`.

```json
{
  "base": { "fill": "#d3d3d3", "hover": "#b0b0b0" },
  "rules": [
    { "when": "competitiveSenate", "fill": "#dc2626", "hover": "#ef4444" },
    { "when": "senate", "fill": "#2563eb", "hover": "#3b82f6" },
    { "when": "competitive", "fill": "#f59e0b", "hover": "#fbbf24" },
    { "when": "anyElection", "fill": "#7b2cbf", "hover": "#457b9d" }
  ],
  "default": { "fill": "#8a817c", "hover": "#457b9d" }
}
```

This is the built-in palette. The available conditions are:

| condition                | holds when                                      |
|--------------------------|-------------------------------------------------|
| `competitiveSenate`      | a Senate election is flagged competitive        |
| `senate`                 | the region has a Senate election                |
| `competitive`            | any election is flagged competitive             |
| `anyElection`            | the region has at least one election            |
| `electionsOver`          | the region's cycle has concluded                |
| `{"category": "House"}`  | the region has an election of that category     |
| `{"minElections": 3}`    | the region has at least that many elections     |

A rule may also set `labelFill` and `labelHover`, the backing colors of the
region label. They default to `fill` and `hover`. Colors are written `#rgb`
or `#rrggbb`.

## The command line

`electionmap` loads the data file (from a path or an `http(s)://` URL) and
writes one of:
* the full list page (`--output-type html`, the default)
* the overlay of one region (`--state CA`)
* the list of regions with one kind of election (`--filter House`)
* a JSON summary with the statistics and the computed styles (`--output-type json`)

With `--interactive` it reads map events from the standard input instead, one
per line, and prints what the page would show:

```text
hover CA 120 300
move 125 310
leave
click CA
dismiss
summary Senate
outside
key Enter House
quit
```

With `--animate` it counts the summary statistics up on the terminal.

*/
