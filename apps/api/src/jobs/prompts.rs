// LLM prompt templates for the jobs module.

/// Job condensation prompt. Replace `{title}` and `{description}` before sending.
pub const CONDENSE_PROMPT_TEMPLATE: &str = "\
Condense the job description below for the role \"{title}\".\n\
\n\
Respond with EXACTLY these three sections and nothing else:\n\
RESPONSIBILITIES:\n\
- bullet\n\
REQUIREMENTS:\n\
- bullet\n\
KEY TECHNOLOGIES:\n\
- bullet\n\
\n\
RULES:\n\
1. At most 3 bullets per section\n\
2. Each bullet at most 15 words\n\
3. Use only information from the description\n\
4. No introduction, no closing remarks\n\
\n\
JOB DESCRIPTION:\n\
{description}";

/// Ranking prompt. Replace `{top_k}`, `{job_count}`, `{resume_bullets}`, `{jobs_block}`.
pub const RANK_PROMPT_TEMPLATE: &str = "\
You are matching a candidate to job postings.\n\
\n\
CANDIDATE BACKGROUND:\n\
{resume_bullets}\n\
\n\
There are {job_count} jobs below, numbered JOB #1 to JOB #{job_count}.\n\
\n\
{jobs_block}\n\
\n\
Select the {top_k} jobs that best fit the candidate and rank them, best first.\n\
Respond with ONLY the ranked list, one job per line, in this exact format:\n\
1. [Job #X] Title at Company\n\
2. [Job #Y] Title at Company\n\
\n\
Refer to each job by its JOB # number. Do not add explanations.";

pub const JOB_SEPARATOR: &str = "----------------------------------------";
